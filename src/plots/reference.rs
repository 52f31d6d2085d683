//! Age/gender reference-percentile overlay.

use tracing::debug;

use crate::canvas::{Canvas, Figure, Spine, Tick, DEFAULT_FIGURE_SIZE};
use crate::error::{PlotError, Result};
use crate::reference::{Gender, ReferenceRow, ReferenceTable};
use crate::style::{
    Color, FillStyle, LineStyle, TextStyle, VAlign, ALL_COLOR, FEMALE_COLOR, MALE_COLOR,
};

/// Percentile curves drawn when the caller does not choose
pub const DEFAULT_PERCENTILES: [u8; 5] = [3, 10, 50, 90, 97];

pub const MIN_AGE: u32 = 40;
pub const MAX_AGE: u32 = 70;
pub const AGE_TICK_STEP: u32 = 10;

/// Darker band, drawn over the outer one
pub const INNER_BAND: (u8, u8) = (10, 90);
pub const OUTER_BAND: (u8, u8) = (3, 97);

const CURVE_ALPHA: f32 = 0.4;
const INNER_BAND_ALPHA: f32 = 0.25;
const OUTER_BAND_ALPHA: f32 = 0.1;
const LABEL_OFFSET_YEARS: f64 = 0.5;
/// Room right of the last tick for the percentile labels
const X_LIMIT_PAD_YEARS: f64 = 1.0;

pub fn gender_color(gender: Gender) -> Color {
    match gender {
        Gender::Female => FEMALE_COLOR,
        Gender::Male => MALE_COLOR,
        Gender::All => ALL_COLOR,
    }
}

/// Draw reference percentile curves and bands for one variable and gender.
///
/// Ages outside 40..=70 are not drawn. Each requested percentile becomes one
/// faint curve labelled at its right end; the 10-90 band is shaded darker
/// than the 3-97 band when the table has those columns. Returns the canvas
/// for chaining.
pub fn plot_age_reference<'c, C: Canvas>(
    table: &ReferenceTable,
    variable: &str,
    gender: Gender,
    percentiles: &[u8],
    canvas: &'c mut C,
) -> Result<&'c mut C> {
    let rows: Vec<&ReferenceRow> = table
        .select(variable, gender)?
        .into_iter()
        .filter(|r| (f64::from(MIN_AGE)..=f64::from(MAX_AGE)).contains(&r.age))
        .collect();
    if let Some(&missing) = percentiles.iter().find(|&&p| !table.has_percentile(p)) {
        return Err(PlotError::MissingPercentile(missing));
    }

    prep_axes(canvas, variable);

    let color = gender_color(gender);
    let ages: Vec<f64> = rows.iter().map(|r| r.age).collect();
    let column = |p: u8| -> Vec<f64> {
        rows.iter()
            .map(|r| r.percentile(p).unwrap_or(f64::NAN))
            .collect()
    };

    for &p in percentiles {
        let values = column(p);
        canvas.line(
            &ages,
            &values,
            LineStyle::new(color).width(1.0).alpha(CURVE_ALPHA),
        );
        if let (Some(&age), Some(&value)) = (ages.last(), values.last()) {
            canvas.text(
                age + LABEL_OFFSET_YEARS,
                value,
                &p.to_string(),
                TextStyle::new(color).font_size(8.0).v_align(VAlign::Center),
            );
        }
    }

    for ((lo, hi), alpha) in [(OUTER_BAND, OUTER_BAND_ALPHA), (INNER_BAND, INNER_BAND_ALPHA)] {
        if table.has_percentile(lo) && table.has_percentile(hi) {
            canvas.fill_between(&ages, &column(lo), &column(hi), FillStyle::new(color, alpha));
        } else {
            debug!(lo, hi, "reference band skipped, column missing");
        }
    }

    debug!(
        variable,
        gender = %gender,
        ages = ages.len(),
        curves = percentiles.len(),
        "drew reference percentiles"
    );
    Ok(canvas)
}

/// Same as [`plot_age_reference`] with [`DEFAULT_PERCENTILES`] on a new figure
pub fn age_reference_figure(
    table: &ReferenceTable,
    variable: &str,
    gender: Gender,
) -> Result<Figure> {
    let mut figure = Figure::new(DEFAULT_FIGURE_SIZE);
    plot_age_reference(table, variable, gender, &DEFAULT_PERCENTILES, &mut figure)?;
    Ok(figure)
}

fn prep_axes<C: Canvas>(canvas: &mut C, variable: &str) {
    canvas.hide_spine(Spine::Right);
    canvas.hide_spine(Spine::Top);
    canvas.set_xlabel("Age", 12.0);
    canvas.set_ylabel(variable, 12.0);

    let ticks: Vec<Tick> = (MIN_AGE..=MAX_AGE)
        .step_by(AGE_TICK_STEP as usize)
        .map(|age| Tick::new(age as f64, age.to_string()))
        .collect();
    canvas.set_xticks(ticks);
    canvas.set_xlim(f64::from(MIN_AGE), f64::from(MAX_AGE) + X_LIMIT_PAD_YEARS);
}
