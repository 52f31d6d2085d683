//! Figure export (PNG, PDF).
//!
//! Both exporters lay the axes out the same way: a plot rectangle inset from
//! the page, spines on the visible sides, tick marks on the bottom and left.
//! Translucent colors are composited over a white background. The PNG
//! rasterizer does not draw text; the PDF writer does.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Polygon, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

// Use fully qualified path to disambiguate from printpdf's image module
use ::image::{Rgba, RgbaImage};

use crate::canvas::{Artist, Canvas, Figure, Spine, Tick};
use crate::error::{PlotError, Result};
use crate::style::{Color, Dash, HAlign, LineStyle, Marker, MarkerStyle, TextStyle, VAlign};

/// Fractions of the page left around the plot rectangle
const MARGIN_LEFT: f64 = 0.08;
const MARGIN_RIGHT: f64 = 0.04;
const MARGIN_TOP: f64 = 0.10;
const MARGIN_BOTTOM: f64 = 0.12;

const TICK_LENGTH_PT: f64 = 3.5;
const POINTS_PER_INCH: f64 = 72.0;
const MM_PER_POINT: f64 = 25.4 / 72.0;

const BACKGROUND: Color = Color::WHITE;

/// Data-to-page mapping for one export target
#[derive(Clone, Copy, Debug)]
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    /// Page y grows downward (raster) or upward (PDF)
    y_down: bool,
}

impl Frame {
    fn new(figure: &Figure, width: f64, height: f64, y_down: bool) -> Result<Self> {
        let (x0, x1) = figure.xlim();
        let (y0, y1) = figure.ylim();
        if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
            return Err(PlotError::DegenerateRange { axis: "x" });
        }
        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return Err(PlotError::DegenerateRange { axis: "y" });
        }
        let (top, bottom) = if y_down {
            (height * MARGIN_TOP, height * (1.0 - MARGIN_BOTTOM))
        } else {
            (height * (1.0 - MARGIN_TOP), height * MARGIN_BOTTOM)
        };
        Ok(Self {
            left: width * MARGIN_LEFT,
            right: width * (1.0 - MARGIN_RIGHT),
            top,
            bottom,
            x0,
            x1,
            y0,
            y1,
            y_down,
        })
    }

    fn x(&self, x: f64) -> f64 {
        self.left + (x - self.x0) / (self.x1 - self.x0) * (self.right - self.left)
    }

    fn y(&self, y: f64) -> f64 {
        self.bottom + (y - self.y0) / (self.y1 - self.y0) * (self.top - self.bottom)
    }

    /// Move a point outward from the plot (below the x-axis / left of the y-axis)
    fn outward(&self, v: f64, amount: f64) -> f64 {
        if self.y_down {
            v + amount
        } else {
            v - amount
        }
    }
}

// ============================================================================
// PNG
// ============================================================================

/// Rasterize a figure and write it as PNG
pub fn save_png(figure: &Figure, path: impl AsRef<Path>, dpi: u32) -> Result<()> {
    let path = path.as_ref();
    let imgbuf = render_png(figure, dpi)?;
    imgbuf.save(path)?;
    info!(path = %path.display(), dpi, "exported figure as PNG");
    Ok(())
}

/// Rasterize a figure at `dpi` pixels per inch
pub fn render_png(figure: &Figure, dpi: u32) -> Result<RgbaImage> {
    let dpi = dpi.max(1) as f64;
    let width = (figure.size[0] as f64 * dpi).round().max(1.0) as u32;
    let height = (figure.size[1] as f64 * dpi).round().max(1.0) as u32;
    let frame = Frame::new(figure, width as f64, height as f64, true)?;
    let px_per_pt = dpi / POINTS_PER_INCH;

    let mut imgbuf = RgbaImage::from_pixel(
        width,
        height,
        Rgba([BACKGROUND.r, BACKGROUND.g, BACKGROUND.b, 255]),
    );
    let clip = Clip {
        x0: frame.left.floor() as i64,
        x1: frame.right.ceil() as i64,
        y0: frame.top.floor() as i64,
        y1: frame.bottom.ceil() as i64,
    };

    for artist in figure.artists() {
        let mut mask = Mask::new(width, height, clip);
        let (color, alpha) = match artist {
            Artist::Line { points, style } => {
                let px: Vec<[f64; 2]> = points.iter().map(|p| [frame.x(p[0]), frame.y(p[1])]).collect();
                stroke_polyline(&mut mask, &px, style, px_per_pt);
                (style.color, style.alpha)
            }
            Artist::VLine { x, style } => {
                let px = frame.x(*x);
                stroke_polyline(&mut mask, &[[px, frame.top], [px, frame.bottom]], style, px_per_pt);
                (style.color, style.alpha)
            }
            Artist::Scatter { points, style } => {
                for p in points {
                    stamp_marker(&mut mask, frame.x(p[0]), frame.y(p[1]), style, px_per_pt);
                }
                (style.color, style.alpha)
            }
            Artist::Fill {
                xs,
                lower,
                upper,
                style,
            } => {
                fill_band(&mut mask, &frame, xs, lower, upper);
                (style.color, style.alpha)
            }
            Artist::Text { .. } => continue,
        };
        mask.blend_into(&mut imgbuf, color, alpha);
    }

    draw_axes_png(&mut imgbuf, figure, &frame, px_per_pt);
    Ok(imgbuf)
}

#[derive(Clone, Copy, Debug)]
struct Clip {
    x0: i64,
    x1: i64,
    y0: i64,
    y1: i64,
}

/// Per-artist coverage so overlapping strokes blend once
struct Mask {
    width: u32,
    height: u32,
    clip: Clip,
    covered: Vec<bool>,
}

impl Mask {
    fn new(width: u32, height: u32, clip: Clip) -> Self {
        Self {
            width,
            height,
            clip,
            covered: vec![false; cell_count(width, height)],
        }
    }

    fn set(&mut self, x: i64, y: i64) {
        let c = self.clip;
        if x < c.x0 || x > c.x1 || y < c.y0 || y > c.y1 {
            return;
        }
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.covered[cell_index(self.width, x as u32, y as u32)] = true;
    }

    fn disk(&mut self, cx: i64, cy: i64, radius: i64) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set(cx + dx, cy + dy);
                }
            }
        }
    }

    fn blend_into(&self, img: &mut RgbaImage, color: Color, alpha: f32) {
        for (i, _) in self.covered.iter().enumerate().filter(|(_, c)| **c) {
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            let Rgba([r, g, b, _]) = *img.get_pixel(x, y);
            let mixed = color.over(Color::rgb(r, g, b), alpha);
            img.put_pixel(x, y, Rgba([mixed.r, mixed.g, mixed.b, 255]));
        }
    }
}

/// Pixel count in `usize` so large rasters do not overflow `u32`
fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn cell_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

fn stroke_polyline(mask: &mut Mask, points: &[[f64; 2]], style: &LineStyle, px_per_pt: f64) {
    let radius = ((style.width as f64 * px_per_pt) / 2.0).round().max(0.0) as i64;
    let dash_unit = (style.width as f64 * px_per_pt).max(1.0).round() as u64;
    let mut step = 0u64;
    for seg in points.windows(2) {
        let ([x0, y0], [x1, y1]) = (seg[0], seg[1]);
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            continue;
        }
        draw_line(
            x0.round() as i64,
            y0.round() as i64,
            x1.round() as i64,
            y1.round() as i64,
            |x, y| {
                let on = match style.dash {
                    Dash::Solid => true,
                    Dash::Dotted => (step / dash_unit) % 3 == 0,
                };
                step += 1;
                if on {
                    mask.disk(x, y, radius);
                }
            },
        );
    }
}

fn stamp_marker(mask: &mut Mask, cx: f64, cy: f64, style: &MarkerStyle, px_per_pt: f64) {
    if !(cx.is_finite() && cy.is_finite()) {
        return;
    }
    let r = style.radius() as f64 * px_per_pt;
    match style.shape {
        Marker::Circle => mask.disk(cx.round() as i64, cy.round() as i64, r.round() as i64),
        Marker::TriangleDown => {
            // Flat edge on top, apex pointing down the page
            let top = cy - r * 0.6;
            let apex = cy + r;
            let rows = (top.round() as i64)..=(apex.round() as i64);
            for y in rows {
                let t = ((apex - y as f64) / (apex - top)).clamp(0.0, 1.0);
                let half = r * t;
                for x in (cx - half).round() as i64..=(cx + half).round() as i64 {
                    mask.set(x, y);
                }
            }
        }
    }
}

fn fill_band(mask: &mut Mask, frame: &Frame, xs: &[f64], lower: &[f64], upper: &[f64]) {
    let n = xs.len().min(lower.len()).min(upper.len());
    for i in 0..n.saturating_sub(1) {
        let (xa, xb) = (frame.x(xs[i]), frame.x(xs[i + 1]));
        let (la, lb) = (frame.y(lower[i]), frame.y(lower[i + 1]));
        let (ua, ub) = (frame.y(upper[i]), frame.y(upper[i + 1]));
        if ![xa, xb, la, lb, ua, ub].iter().all(|v| v.is_finite()) {
            continue;
        }
        let (c0, c1) = (xa.min(xb).round() as i64, xa.max(xb).round() as i64);
        for col in c0..=c1 {
            let t = if (xb - xa).abs() < f64::EPSILON {
                0.0
            } else {
                ((col as f64 - xa) / (xb - xa)).clamp(0.0, 1.0)
            };
            let lo = la + (lb - la) * t;
            let hi = ua + (ub - ua) * t;
            for row in lo.min(hi).round() as i64..=lo.max(hi).round() as i64 {
                mask.set(col, row);
            }
        }
    }
}

fn draw_axes_png(imgbuf: &mut RgbaImage, figure: &Figure, frame: &Frame, px_per_pt: f64) {
    let (w, h) = imgbuf.dimensions();
    let open = Clip {
        x0: 0,
        x1: w as i64 - 1,
        y0: 0,
        y1: h as i64 - 1,
    };
    let mut mask = Mask::new(w, h, open);
    let (l, r) = (frame.left.round() as i64, frame.right.round() as i64);
    let (t, b) = (frame.top.round() as i64, frame.bottom.round() as i64);

    let mut edge = |x0: i64, y0: i64, x1: i64, y1: i64| draw_line(x0, y0, x1, y1, |x, y| mask.set(x, y));
    if figure.spine_visible(Spine::Left) {
        edge(l, t, l, b);
    }
    if figure.spine_visible(Spine::Right) {
        edge(r, t, r, b);
    }
    if figure.spine_visible(Spine::Top) {
        edge(l, t, r, t);
    }
    if figure.spine_visible(Spine::Bottom) {
        edge(l, b, r, b);
    }

    let tick = (TICK_LENGTH_PT * px_per_pt).round() as i64;
    for Tick { value, .. } in figure.resolved_x_ticks() {
        let x = frame.x(value).round() as i64;
        edge(x, b, x, b + tick);
    }
    for Tick { value, .. } in figure.resolved_y_ticks() {
        let y = frame.y(value).round() as i64;
        edge(l - tick, y, l, y);
    }

    mask.blend_into(imgbuf, Color::BLACK, 1.0);
}

/// Walk the pixels of a line between two points using Bresenham's algorithm
fn draw_line(x0: i64, y0: i64, x1: i64, y1: i64, mut plot: impl FnMut(i64, i64)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: i64 = if x0 < x1 { 1 } else { -1 };
    let sy: i64 = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        plot(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

// ============================================================================
// PDF
// ============================================================================

/// Write a figure as a single-page PDF sized like the figure
pub fn save_pdf(figure: &Figure, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let width_mm = figure.size[0] as f64 * 25.4;
    let height_mm = figure.size[1] as f64 * 25.4;
    let frame = Frame::new(figure, width_mm, height_mm, false)?;

    let (doc, page1, layer1) = PdfDocument::new(
        "glucoplot figure",
        Mm(width_mm as f32),
        Mm(height_mm as f32),
        "Figure",
    );
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PlotError::Pdf(e.to_string()))?;

    for artist in figure.artists() {
        match artist {
            Artist::Fill {
                xs,
                lower,
                upper,
                style,
            } => {
                let n = xs.len().min(lower.len()).min(upper.len());
                let mut ring: Vec<(Point, bool)> = (0..n)
                    .map(|i| point(&frame, xs[i], lower[i]))
                    .collect();
                ring.extend((0..n).rev().map(|i| point(&frame, xs[i], upper[i])));
                if ring.len() >= 3 {
                    layer.set_fill_color(pdf_color(style.color.over(BACKGROUND, style.alpha)));
                    layer.add_polygon(Polygon {
                        rings: vec![ring],
                        mode: PaintMode::Fill,
                        winding_order: WindingOrder::NonZero,
                    });
                }
            }
            Artist::Line { points, style } => {
                let pts: Vec<(Point, bool)> = points
                    .iter()
                    .filter(|p| p[0].is_finite() && p[1].is_finite())
                    .map(|p| point(&frame, p[0], p[1]))
                    .collect();
                stroke_pdf(&layer, pts, style);
            }
            Artist::VLine { x, style } => {
                let x = frame.x(*x);
                if x >= frame.left && x <= frame.right {
                    let pts = vec![
                        (Point::new(Mm(x as f32), Mm(frame.bottom as f32)), false),
                        (Point::new(Mm(x as f32), Mm(frame.top as f32)), false),
                    ];
                    stroke_pdf(&layer, pts, style);
                }
            }
            Artist::Scatter { points, style } => {
                layer.set_fill_color(pdf_color(style.color.over(BACKGROUND, style.alpha)));
                let r = style.radius() as f64 * MM_PER_POINT;
                for p in points.iter().filter(|p| p[0].is_finite() && p[1].is_finite()) {
                    let (cx, cy) = (clamp_x(&frame, frame.x(p[0])), clamp_y(&frame, frame.y(p[1])));
                    layer.add_polygon(Polygon {
                        rings: vec![marker_ring(style.shape, cx, cy, r)],
                        mode: PaintMode::Fill,
                        winding_order: WindingOrder::NonZero,
                    });
                }
            }
            Artist::Text { x, y, text, style } => {
                text_pdf(&layer, &font, frame.x(*x), frame.y(*y), text, style);
            }
        }
    }

    draw_axes_pdf(&layer, &font, figure, &frame);

    let file = File::create(path).map_err(|e| PlotError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| PlotError::Pdf(e.to_string()))?;

    info!(path = %path.display(), "exported figure as PDF");
    Ok(())
}

fn pdf_color(color: Color) -> PdfColor {
    let [r, g, b] = color.to_unit();
    PdfColor::Rgb(Rgb::new(r, g, b, None))
}

fn clamp_x(frame: &Frame, x: f64) -> f64 {
    x.clamp(frame.left, frame.right)
}

fn clamp_y(frame: &Frame, y: f64) -> f64 {
    y.clamp(frame.bottom.min(frame.top), frame.bottom.max(frame.top))
}

/// Data point mapped into the page and held inside the plot rectangle
fn point(frame: &Frame, x: f64, y: f64) -> (Point, bool) {
    let px = clamp_x(frame, frame.x(x));
    let py = clamp_y(frame, frame.y(y));
    (Point::new(Mm(px as f32), Mm(py as f32)), false)
}

fn stroke_pdf(layer: &PdfLayerReference, points: Vec<(Point, bool)>, style: &LineStyle) {
    if points.len() < 2 {
        return;
    }
    let width = match style.dash {
        Dash::Solid => style.width,
        Dash::Dotted => style.width * 0.5,
    };
    layer.set_outline_color(pdf_color(style.color.over(BACKGROUND, style.alpha)));
    layer.set_outline_thickness(width);
    layer.add_line(Line {
        points,
        is_closed: false,
    });
}

fn marker_ring(shape: Marker, cx: f64, cy: f64, r: f64) -> Vec<(Point, bool)> {
    let vertex = |x: f64, y: f64| (Point::new(Mm(x as f32), Mm(y as f32)), false);
    match shape {
        Marker::Circle => (0..16)
            .map(|k| {
                let a = k as f64 / 16.0 * std::f64::consts::TAU;
                vertex(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect(),
        Marker::TriangleDown => vec![
            vertex(cx - r, cy + r * 0.6),
            vertex(cx + r, cy + r * 0.6),
            vertex(cx, cy - r),
        ],
    }
}

fn text_pdf(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    x: f64,
    y: f64,
    text: &str,
    style: &TextStyle,
) {
    if !(x.is_finite() && y.is_finite()) {
        return;
    }
    let size_mm = style.font_size as f64 * MM_PER_POINT;
    let line_height = size_mm * 1.2;
    let lines: Vec<&str> = text.lines().collect();
    let block = line_height * lines.len().saturating_sub(1) as f64;
    // Multi-line text grows upward from its anchor, like a bottom-aligned block
    let first_baseline = match style.v_align {
        VAlign::Baseline => y + block,
        VAlign::Center => y + block / 2.0 - size_mm * 0.35,
        VAlign::Top => y - size_mm,
    };

    layer.set_fill_color(pdf_color(style.color));
    for (i, line) in lines.iter().enumerate() {
        // Helvetica averages roughly half an em per glyph
        let width = line.chars().count() as f64 * size_mm * 0.5;
        let left = match style.h_align {
            HAlign::Left => x,
            HAlign::Center => x - width / 2.0,
            HAlign::Right => x - width,
        };
        let baseline = first_baseline - i as f64 * line_height;
        layer.use_text(
            *line,
            style.font_size,
            Mm(left as f32),
            Mm(baseline as f32),
            font,
        );
    }
}

fn draw_axes_pdf(layer: &PdfLayerReference, font: &IndirectFontRef, figure: &Figure, frame: &Frame) {
    let axis = LineStyle::new(Color::BLACK).width(0.8);
    let seg = |x0: f64, y0: f64, x1: f64, y1: f64| {
        vec![
            (Point::new(Mm(x0 as f32), Mm(y0 as f32)), false),
            (Point::new(Mm(x1 as f32), Mm(y1 as f32)), false),
        ]
    };
    let (l, r, t, b) = (frame.left, frame.right, frame.top, frame.bottom);
    if figure.spine_visible(Spine::Left) {
        stroke_pdf(layer, seg(l, b, l, t), &axis);
    }
    if figure.spine_visible(Spine::Right) {
        stroke_pdf(layer, seg(r, b, r, t), &axis);
    }
    if figure.spine_visible(Spine::Top) {
        stroke_pdf(layer, seg(l, t, r, t), &axis);
    }
    if figure.spine_visible(Spine::Bottom) {
        stroke_pdf(layer, seg(l, b, r, b), &axis);
    }

    let tick = TICK_LENGTH_PT * MM_PER_POINT;
    let label = TextStyle::new(Color::BLACK).font_size(8.0);
    for Tick { value, label: text } in figure.resolved_x_ticks() {
        let x = frame.x(value);
        stroke_pdf(layer, seg(x, b, x, frame.outward(b, tick)), &axis);
        text_pdf(
            layer,
            font,
            x,
            frame.outward(b, tick + 3.5),
            &text,
            &label.h_align(HAlign::Center),
        );
    }
    for Tick { value, label: text } in figure.resolved_y_ticks() {
        let y = frame.y(value);
        stroke_pdf(layer, seg(l - tick, y, l, y), &axis);
        text_pdf(
            layer,
            font,
            l - tick - 1.0,
            y,
            &text,
            &label.h_align(HAlign::Right).v_align(VAlign::Center),
        );
    }

    if let Some(x_label) = figure.x_label() {
        let style = TextStyle::new(Color::BLACK)
            .font_size(x_label.font_size)
            .h_align(HAlign::Center);
        text_pdf(layer, font, (l + r) / 2.0, frame.outward(b, tick + 9.0), &x_label.text, &style);
    }
    if let Some(y_label) = figure.y_label() {
        // Horizontal label above the y-axis; the PDF writer has no rotated text
        let style = TextStyle::new(Color::BLACK).font_size(y_label.font_size);
        text_pdf(layer, font, l, t + 3.0, &y_label.text, &style);
    }
}
