//! Resolved paint and its renderer-specific encodings
//!
//! Resolution decides a [`Paint`] once. Only at the very end is it encoded:
//! symbolic output keeps theme references for the vector renderer, GPU-safe
//! output substitutes concrete hex values. Both encodings describe the same
//! visual color under the context's theme.

use serde::{Deserialize, Serialize};

use crate::colormap::Color;
use crate::theme::{Theme, ThemeToken};

/// Target form of color strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorEncoding {
    /// Theme references and HSL triples, for CSS-capable renderers
    #[default]
    Symbolic,
    /// Concrete `#RRGGBB` only, for WebGL / 3D renderers
    GpuSafe,
}

/// A color decision before encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintColor {
    Concrete(Color),
    Themed(ThemeToken),
    /// Hue in degrees, saturation and lightness in percent
    Hsl { h: f32, s: f32, l: f32 },
}

impl PaintColor {
    /// The concrete color under a theme
    pub fn concrete(&self, theme: &Theme) -> Color {
        match *self {
            PaintColor::Concrete(c) => c,
            PaintColor::Themed(token) => theme.color(token),
            PaintColor::Hsl { h, s, l } => Color::from_hsl(h, s / 100.0, l / 100.0),
        }
    }

    pub fn encode(&self, encoding: ColorEncoding, theme: &Theme) -> String {
        match (encoding, self) {
            (ColorEncoding::Symbolic, PaintColor::Themed(token)) => token.css_reference(),
            (ColorEncoding::Symbolic, PaintColor::Hsl { h, s, l }) => {
                format!("hsl({h:.2}, {s:.0}%, {l:.0}%)")
            }
            _ => self.concrete(theme).to_hex(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: PaintColor,
    pub width: f32,
}

/// Full visual decision for one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: PaintColor,
    pub opacity: f32,
    pub stroke: Option<Stroke>,
    pub hidden: bool,
    pub z_index: u8,
    pub size_scale: f32,
}

impl Paint {
    pub fn fill(fill: PaintColor, opacity: f32) -> Self {
        Self {
            fill,
            opacity,
            stroke: None,
            hidden: false,
            z_index: 0,
            size_scale: 1.0,
        }
    }

    pub fn encode(&self, encoding: ColorEncoding, theme: &Theme) -> ColorResult {
        ColorResult {
            color: self.fill.encode(encoding, theme),
            opacity: self.opacity,
            stroke: self.stroke.map(|s| s.color.encode(encoding, theme)),
            stroke_width: self.stroke.map(|s| s.width),
            hidden: self.hidden,
            z_index: self.z_index,
            size_scale: self.size_scale,
        }
    }
}

/// Per-sample output handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorResult {
    /// Fill color string in the requested encoding
    pub color: String,
    pub opacity: f32,
    pub stroke: Option<String>,
    pub stroke_width: Option<f32>,
    /// Excluded by the display filter; renderers skip it entirely
    pub hidden: bool,
    /// Draw order, higher on top
    pub z_index: u8,
    /// Marker size multiplier
    pub size_scale: f32,
}

impl ColorResult {
    /// Fill as RGBA floats, opacity in alpha (GPU-safe results only)
    pub fn fill_rgba(&self) -> Option<[f32; 4]> {
        Color::from_hex(&self.color).map(|c| c.with_alpha(self.opacity).to_array())
    }

    /// Stroke as RGBA floats (GPU-safe results only)
    pub fn stroke_rgba(&self) -> Option<[f32; 4]> {
        self.stroke
            .as_deref()
            .and_then(Color::from_hex)
            .map(|c| c.to_array())
    }

    pub fn is_drawn(&self) -> bool {
        !self.hidden
    }
}
