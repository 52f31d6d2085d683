//! Tests for user settings persistence
//!
//! Tests cover:
//! - Default settings values
//! - Partial and malformed JSON
//! - Save/load roundtrip

use std::path::PathBuf;

use glucoplot::settings::PlotSettings;
use tempfile::tempdir;

// ============================================
// Default Settings Tests
// ============================================

#[test]
fn test_settings_default_version() {
    let settings = PlotSettings::default();
    assert_eq!(settings.version, 1);
}

#[test]
fn test_settings_default_sizes() {
    let settings = PlotSettings::default();
    assert_eq!(settings.reference_figure_size, [8.0, 5.0]);
    assert_eq!(settings.cgm_figure_size, [18.0, 5.0]);
    assert_eq!(settings.png_dpi, 100);
}

#[test]
fn test_default_reference_path_is_bundled_table() {
    let settings = PlotSettings::default();
    assert_eq!(
        settings.reference_path(),
        PathBuf::from("data/reference_percentiles.csv")
    );
}

// ============================================
// Deserialization Tests
// ============================================

#[test]
fn test_settings_missing_fields_use_defaults() {
    let settings = PlotSettings::from_json(r#"{"png_dpi": 300}"#).unwrap();
    assert_eq!(settings.png_dpi, 300);
    assert_eq!(settings.version, 1);
    assert_eq!(settings.cgm_figure_size, [18.0, 5.0]);
}

#[test]
fn test_settings_invalid_json_is_error() {
    assert!(PlotSettings::from_json("{not json").is_err());
}

#[test]
fn test_load_from_garbage_falls_back_to_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage_settings.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert_eq!(PlotSettings::load_from(&path), PlotSettings::default());
}

// ============================================
// Roundtrip Tests
// ============================================

#[test]
fn test_settings_save_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let settings = PlotSettings {
        png_dpi: 200,
        reference_path: Some(PathBuf::from("/tmp/custom.csv")),
        ..Default::default()
    };
    settings.save_to(&path).unwrap();
    assert_eq!(PlotSettings::load_from(&path), settings);
}
