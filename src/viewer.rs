//! Interactive display of a recorded [`Figure`] with egui_plot.

use eframe::egui;
use egui_plot::{
    GridInput, GridMark, Line, LineStyle as PlotLineStyle, MarkerShape, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text, VLine,
};

use crate::canvas::{Artist, Canvas, Figure, Tick};
use crate::style::{Color, Dash, HAlign, Marker, VAlign};

/// Screen pixels per point when sizing strokes and markers
const PIXELS_PER_POINT: f32 = 1.0;

fn color32(color: Color, alpha: f32) -> egui::Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, a)
}

fn anchor(h: HAlign, v: VAlign) -> egui::Align2 {
    let x = match h {
        HAlign::Left => egui::Align::Min,
        HAlign::Center => egui::Align::Center,
        HAlign::Right => egui::Align::Max,
    };
    let y = match v {
        VAlign::Top => egui::Align::Min,
        VAlign::Center => egui::Align::Center,
        VAlign::Baseline => egui::Align::Max,
    };
    egui::Align2([x, y])
}

/// Draws a figure inside an egui `Ui`
pub struct FigureView<'a> {
    figure: &'a Figure,
    id: String,
}

impl<'a> FigureView<'a> {
    pub fn new(figure: &'a Figure, id: impl Into<String>) -> Self {
        Self {
            figure,
            id: id.into(),
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let figure = self.figure;
        let (x0, x1) = figure.xlim();
        let (y0, y1) = figure.ylim();
        let x_ticks = figure.resolved_x_ticks();
        let labels = x_ticks.clone();

        let mut plot = Plot::new(self.id.as_str())
            .legend(egui_plot::Legend::default())
            .default_x_bounds(x0, x1)
            .default_y_bounds(y0, y1)
            .x_axis_formatter(move |mark, _range| label_for(&labels, mark.value))
            .x_grid_spacer(move |_input: GridInput| {
                x_ticks
                    .windows(2)
                    .map(|w| GridMark {
                        value: w[0].value,
                        step_size: w[1].value - w[0].value,
                    })
                    .chain(x_ticks.last().map(|t| GridMark {
                        value: t.value,
                        step_size: x_ticks
                            .windows(2)
                            .last()
                            .map_or(1.0, |w| w[1].value - w[0].value),
                    }))
                    .collect()
            });
        if let Some(label) = figure.x_label() {
            plot = plot.x_axis_label(label.text.clone());
        }
        if let Some(label) = figure.y_label() {
            plot = plot.y_axis_label(label.text.clone());
        }

        plot.show(ui, |plot_ui| {
            for (i, artist) in figure.artists().iter().enumerate() {
                match artist {
                    Artist::Line { points, style } => {
                        let plot_points: PlotPoints = points.iter().copied().collect();
                        let mut line = Line::new(format!("line {}", i), plot_points)
                            .color(color32(style.color, style.alpha))
                            .width(style.width * PIXELS_PER_POINT);
                        if style.dash == Dash::Dotted {
                            line = line.style(PlotLineStyle::dotted_dense());
                        }
                        plot_ui.line(line);
                    }
                    Artist::Scatter { points, style } => {
                        let plot_points: PlotPoints = points.iter().copied().collect();
                        let shape = match style.shape {
                            Marker::Circle => MarkerShape::Circle,
                            Marker::TriangleDown => MarkerShape::Down,
                        };
                        let name = style.label.clone().unwrap_or_else(|| format!("points {}", i));
                        plot_ui.points(
                            Points::new(name, plot_points)
                                .radius(style.radius() * PIXELS_PER_POINT)
                                .shape(shape)
                                .filled(true)
                                .color(color32(style.color, style.alpha)),
                        );
                    }
                    Artist::Fill {
                        xs,
                        lower,
                        upper,
                        style,
                    } => {
                        let mut outline: Vec<[f64; 2]> =
                            xs.iter().zip(lower).map(|(&x, &y)| [x, y]).collect();
                        outline.extend(xs.iter().zip(upper).rev().map(|(&x, &y)| [x, y]));
                        plot_ui.polygon(
                            Polygon::new(format!("band {}", i), PlotPoints::from(outline))
                                .fill_color(color32(style.color, style.alpha))
                                .stroke(egui::Stroke::NONE),
                        );
                    }
                    Artist::VLine { x, style } => {
                        plot_ui.vline(
                            VLine::new(format!("marker {}", i), *x)
                                .color(color32(style.color, style.alpha))
                                .width(style.width * PIXELS_PER_POINT),
                        );
                    }
                    Artist::Text { x, y, text, style } => {
                        plot_ui.text(
                            Text::new(
                                format!("text {}", i),
                                PlotPoint::new(*x, *y),
                                egui::RichText::new(text).size(style.font_size),
                            )
                            .color(color32(style.color, 1.0))
                            .anchor(anchor(style.h_align, style.v_align)),
                        );
                    }
                }
            }
        });
    }
}

fn label_for(ticks: &[Tick], value: f64) -> String {
    ticks
        .iter()
        .find(|t| (t.value - value).abs() < 1e-9)
        .map(|t| t.label.clone())
        .unwrap_or_default()
}

struct FigureWindow {
    figure: Figure,
}

impl eframe::App for FigureWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            FigureView::new(&self.figure, "figure").show(ui);
        });
    }
}

/// Open a native window showing `figure` until it is closed
pub fn show_figure(figure: Figure, title: &str) -> eframe::Result<()> {
    let [w, h] = figure.size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([w * 100.0, h * 100.0])
            .with_title(title),
        ..Default::default()
    };
    eframe::run_native(
        title,
        native_options,
        Box::new(|_cc| Ok(Box::new(FigureWindow { figure }))),
    )
}
