//! Colors and drawing styles used by the plotters.
//!
//! Styles are plain values handed to a [`Canvas`](crate::canvas::Canvas)
//! together with the geometry they apply to. Sizes follow the usual
//! plotting conventions: line widths and font sizes in points, marker sizes
//! as area in square points.

use serde::{Deserialize, Serialize};

// ============================================================================
// Colors
// ============================================================================

/// An opaque RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const NAVY: Color = Color::rgb(0, 0, 128);
    pub const BROWN: Color = Color::rgb(165, 42, 42);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);

    /// Composite this color with `alpha` over an opaque background
    pub fn over(self, background: Color, alpha: f32) -> Color {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (fg as f32 * a + bg as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8
        };
        Color::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    /// Components scaled to 0.0..=1.0
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// The ten-color categorical palette ("C0".."C9")
pub const TAB10: [Color; 10] = [
    Color::rgb(31, 119, 180),  // C0 blue
    Color::rgb(255, 127, 14),  // C1 orange
    Color::rgb(44, 160, 44),   // C2 green
    Color::rgb(214, 39, 40),   // C3 red
    Color::rgb(148, 103, 189), // C4 purple
    Color::rgb(140, 86, 75),   // C5 brown
    Color::rgb(227, 119, 194), // C6 pink
    Color::rgb(127, 127, 127), // C7 gray
    Color::rgb(188, 189, 34),  // C8 olive
    Color::rgb(23, 190, 207),  // C9 cyan
];

/// Glucose trace color
pub const GLUCOSE_COLOR: Color = TAB10[0];
/// Meal annotations
pub const DIET_COLOR: Color = Color::BROWN;
/// Sleep shading
pub const SLEEP_COLOR: Color = Color::PURPLE;
/// AGP percentile envelopes
pub const AGP_BAND_COLOR: Color = Color::NAVY;

pub const MALE_COLOR: Color = TAB10[0];
pub const FEMALE_COLOR: Color = TAB10[1];
pub const ALL_COLOR: Color = TAB10[5];

// ============================================================================
// Styles
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dash {
    #[default]
    Solid,
    Dotted,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
    pub alpha: f32,
    pub dash: Dash,
}

impl LineStyle {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            width: 1.5,
            alpha: 1.0,
            dash: Dash::Solid,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    #[default]
    Circle,
    TriangleDown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Color,
    /// Marker area in square points
    pub size: f32,
    pub alpha: f32,
    pub shape: Marker,
    /// Legend label
    pub label: Option<String>,
}

impl MarkerStyle {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            size: 36.0,
            alpha: 1.0,
            shape: Marker::Circle,
            label: None,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn shape(mut self, shape: Marker) -> Self {
        self.shape = shape;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marker radius in points
    pub fn radius(&self) -> f32 {
        self.size.max(0.0).sqrt() / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub color: Color,
    pub alpha: f32,
}

impl FillStyle {
    pub fn new(color: Color, alpha: f32) -> Self {
        Self { color, alpha }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    #[default]
    Baseline,
    Center,
    Top,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f32,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl TextStyle {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            font_size: 10.0,
            h_align: HAlign::Left,
            v_align: VAlign::Baseline,
        }
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn h_align(mut self, align: HAlign) -> Self {
        self.h_align = align;
        self
    }

    pub fn v_align(mut self, align: VAlign) -> Self {
        self.v_align = align;
        self
    }
}
