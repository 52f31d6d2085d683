//! glucoplot - glucose and reference-percentile charts
//!
//! Opens the reference-band explorer on the configured percentile table.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use glucoplot::app::GlucoplotApp;
use glucoplot::reference::ReferenceTable;
use glucoplot::settings::PlotSettings;

fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glucoplot=info")),
        )
        .init();

    let settings = PlotSettings::load();
    let reference_path = settings.reference_path();
    let table = ReferenceTable::load(&reference_path)
        .with_context(|| format!("loading reference table {}", reference_path.display()))?;

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("glucoplot - Reference Percentiles")
            .with_app_id("glucoplot"),
        ..Default::default()
    };

    eframe::run_native(
        "glucoplot",
        native_options,
        Box::new(move |cc| Ok(Box::new(GlucoplotApp::new(cc, table, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {}", e))
}
