//! Reference-band explorer: pick a variable and gender, view the percentile
//! chart, export it.

use eframe::egui;
use std::path::Path;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use tracing::{error, info};

use crate::canvas::Figure;
use crate::error::Result;
use crate::export::{save_pdf, save_png};
use crate::plots::reference::{plot_age_reference, DEFAULT_PERCENTILES};
use crate::reference::{Gender, ReferenceTable};
use crate::settings::PlotSettings;
use crate::viewer::FigureView;

const TOAST_DURATION: Duration = Duration::from_secs(3);

pub struct GlucoplotApp {
    table: ReferenceTable,
    settings: PlotSettings,
    variable: String,
    gender: Gender,
    figure: Option<Figure>,
    /// Why the current selection could not be drawn
    plot_error: Option<String>,
    toast_message: Option<(String, Instant)>,
}

impl GlucoplotApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, table: ReferenceTable, settings: PlotSettings) -> Self {
        let variable = table.variables().into_iter().next().unwrap_or_default();
        let mut app = Self {
            table,
            settings,
            variable,
            gender: Gender::All,
            figure: None,
            plot_error: None,
            toast_message: None,
        };
        app.redraw();
        app
    }

    /// Re-render the chart for the current selection
    fn redraw(&mut self) {
        let mut figure = Figure::new(self.settings.reference_figure_size);
        match plot_age_reference(
            &self.table,
            &self.variable,
            self.gender,
            &DEFAULT_PERCENTILES,
            &mut figure,
        ) {
            Ok(_) => {
                self.figure = Some(figure);
                self.plot_error = None;
            }
            Err(e) => {
                self.figure = None;
                self.plot_error = Some(e.to_string());
            }
        }
    }

    fn show_toast(&mut self, message: &str) {
        self.toast_message = Some((message.to_string(), Instant::now()));
    }

    fn default_file_name(&self, extension: &str) -> String {
        format!(
            "{}_{}.{}",
            self.variable.to_lowercase(),
            self.gender.as_ref().to_lowercase(),
            extension
        )
    }

    fn export_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(self.default_file_name("png"))
            .save_file()
        else {
            return;
        };
        let dpi = self.settings.png_dpi;
        self.finish_export(&path, "PNG", |figure, path| save_png(figure, path, dpi));
    }

    fn export_pdf(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF Document", &["pdf"])
            .set_file_name(self.default_file_name("pdf"))
            .save_file()
        else {
            return;
        };
        self.finish_export(&path, "PDF", |figure, path| save_pdf(figure, path));
    }

    fn finish_export(
        &mut self,
        path: &Path,
        kind: &str,
        write: impl FnOnce(&Figure, &Path) -> Result<()>,
    ) {
        let Some(figure) = &self.figure else {
            return;
        };
        match write(figure, path) {
            Ok(()) => self.show_toast(&format!("Chart exported as {}", kind)),
            Err(e) => {
                error!(error = %e, "export failed");
                self.show_toast(&format!("Export failed: {}", e));
            }
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label("Variable");
            egui::ComboBox::from_id_salt("variable")
                .selected_text(&self.variable)
                .show_ui(ui, |ui| {
                    for variable in self.table.variables() {
                        changed |= ui
                            .selectable_value(&mut self.variable, variable.clone(), variable)
                            .changed();
                    }
                });

            ui.label("Gender");
            egui::ComboBox::from_id_salt("gender")
                .selected_text(self.gender.as_ref())
                .show_ui(ui, |ui| {
                    for gender in Gender::iter() {
                        changed |= ui
                            .selectable_value(&mut self.gender, gender, gender.as_ref())
                            .changed();
                    }
                });

            ui.separator();
            let can_export = self.figure.is_some();
            if ui.add_enabled(can_export, egui::Button::new("Export PNG")).clicked() {
                self.export_png();
            }
            if ui.add_enabled(can_export, egui::Button::new("Export PDF")).clicked() {
                self.export_pdf();
            }
        });

        if changed {
            info!(variable = %self.variable, gender = %self.gender, "selection changed");
            self.redraw();
        }
    }

    fn render_toast(&mut self, ctx: &egui::Context) {
        let Some((message, time)) = &self.toast_message else {
            return;
        };
        if time.elapsed() > TOAST_DURATION {
            self.toast_message = None;
            return;
        }
        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(message.as_str());
                });
            });
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for GlucoplotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.render_controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match (&self.figure, &self.plot_error) {
            (Some(figure), _) => FigureView::new(figure, "reference_chart").show(ui),
            (None, Some(message)) => {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(191, 78, 48)));
                });
            }
            (None, None) => {
                ui.centered_and_justified(|ui| {
                    ui.label("No reference data loaded");
                });
            }
        });

        self.render_toast(ctx);
    }
}
