//! Tests for figure export
//!
//! Tests cover:
//! - PNG size and content
//! - PDF file creation
//! - Degenerate axes

use glucoplot::canvas::{Canvas, Figure};
use glucoplot::error::PlotError;
use glucoplot::export::{render_png, save_pdf, save_png};
use glucoplot::plots::{age_reference_figure, CgmPlot};
use glucoplot::reference::{Gender, ReferenceTable};
use glucoplot::series::SleepInterval;

use tempfile::tempdir;

use crate::common::{at, five_point_series, meals, REFERENCE_CSV};

fn cgm_figure() -> Figure {
    CgmPlot::new(five_point_series())
        .with_meals(meals())
        .with_sleep(vec![SleepInterval::new(at(8, 20), at(8, 35))])
        .render_new()
        .unwrap()
}

#[test]
fn test_png_export_writes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.png");
    save_png(&cgm_figure(), &path, 40).unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.width(), 18 * 40);
    assert_eq!(img.height(), 5 * 40);
}

#[test]
fn test_png_contains_trace_color() {
    let img = render_png(&cgm_figure(), 40).unwrap();
    // Glucose markers are C0 blue blended at 0.6 or stronger
    let bluish = img
        .pixels()
        .filter(|p| p.0[2] > p.0[0].saturating_add(60))
        .count();
    assert!(bluish > 50, "expected visible glucose trace, got {} pixels", bluish);
}

#[test]
fn test_pdf_export_writes_pdf() {
    let table = ReferenceTable::load(REFERENCE_CSV).unwrap();
    let figure = age_reference_figure(&table, "BMI", Gender::Female).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("bmi_female.pdf");
    save_pdf(&figure, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_export_rejects_degenerate_x_range() {
    let mut figure = Figure::default();
    figure.set_xlim(3.0, 3.0);
    let dir = tempdir().unwrap();
    let path = dir.path().join("degenerate.png");
    assert!(matches!(
        save_png(&figure, &path, 50),
        Err(PlotError::DegenerateRange { axis: "x" })
    ));
    assert!(!path.exists());
}

#[test]
fn test_pdf_to_missing_directory_is_io_error() {
    let figure = Figure::default();
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("deeper").join("out.pdf");
    assert!(matches!(save_pdf(&figure, &path), Err(PlotError::Io { .. })));
}

#[test]
fn test_exported_files_do_not_outlive_scratch_dir() {
    let dir = tempdir().unwrap();
    let png = dir.path().join("trace.png");
    let pdf = dir.path().join("trace.pdf");
    save_png(&cgm_figure(), &png, 20).unwrap();
    save_pdf(&cgm_figure(), &pdf).unwrap();
    assert!(png.exists() && pdf.exists());

    let root = dir.path().to_path_buf();
    dir.close().unwrap();
    assert!(!root.exists());
}
