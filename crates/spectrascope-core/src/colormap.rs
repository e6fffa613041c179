//! Palettes for sample coloring
//!
//! Provides:
//! - Continuous palettes (gradient tables) for target values and numeric
//!   metadata: blue-red, viridis, plasma, inferno, magma, coolwarm
//! - Categorical palettes for folds, partitions, classes and discrete
//!   metadata: tableau10, set1, pastel
//!
//! Continuous palettes interpolate linearly between evenly spaced stops.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB (alpha = 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from a packed 0xRRGGBB value
    pub const fn from_rgb_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create a color from hex string (e.g., "#FF5733" or "FF5733")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;

        Some(Self::rgb(r, g, b))
    }

    /// Parse a hex string, reporting the offending input on failure
    pub fn parse_hex(hex: &str) -> CoreResult<Self> {
        Self::from_hex(hex).ok_or_else(|| CoreError::InvalidColor(hex.to_string()))
    }

    /// Create from hue (degrees), saturation and lightness (0.0 to 1.0)
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        Self::rgb(r1 + m, g1 + m, b1 + m)
    }

    /// Quantize to 8-bit channels (alpha dropped)
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    /// Convert to array [r, g, b, a]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// A colormap for mapping scalar values to colors
#[derive(Clone, Debug)]
pub struct Colormap {
    /// Name of the colormap
    pub name: String,
    /// Color stops (positions from 0.0 to 1.0)
    stops: Vec<(f32, Color)>,
    /// Whether the colormap is reversed
    reversed: bool,
}

impl Colormap {
    /// Create a new colormap from a list of colors (evenly spaced)
    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        let n = colors.len();
        let stops: Vec<(f32, Color)> = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / (n.saturating_sub(1)).max(1) as f32, c))
            .collect();

        Self {
            name: name.into(),
            stops,
            reversed: false,
        }
    }

    fn from_hex_table(name: &str, table: &[u32]) -> Self {
        Self::from_colors(name, table.iter().map(|&h| Color::from_rgb_u32(h)).collect())
    }

    /// Reverse the colormap
    pub fn reversed(mut self) -> Self {
        self.reversed = !self.reversed;
        self
    }

    /// First color of the gradient
    pub fn start(&self) -> Color {
        self.sample(0.0)
    }

    /// Last color of the gradient
    pub fn end(&self) -> Color {
        self.sample(1.0)
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, t: f32) -> Color {
        let mut t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if self.reversed {
            t = 1.0 - t;
        }

        if self.stops.is_empty() {
            return Color::default();
        }

        if self.stops.len() == 1 {
            return self.stops[0].1;
        }

        for pair in self.stops.windows(2) {
            let (t0, c0) = &pair[0];
            let (t1, c1) = &pair[1];

            if t >= *t0 && t <= *t1 {
                let local_t = (t - t0) / (t1 - t0);
                return Color::lerp(c0, c1, local_t);
            }
        }

        self.stops.last().map(|(_, c)| *c).unwrap_or_default()
    }

    /// Generate a lookup table of the specified size
    pub fn generate_lut(&self, size: usize) -> Vec<Color> {
        (0..size)
            .map(|i| self.sample(i as f32 / (size.saturating_sub(1)).max(1) as f32))
            .collect()
    }
}

// MARK: - Continuous palettes

const BLUE_RED: &[u32] = &[0x2166AC, 0x67A9CF, 0xD1E5F0, 0xF7F7F7, 0xFDDBC7, 0xEF8A62, 0xB2182B];
const VIRIDIS: &[u32] = &[
    0x440154, 0x482878, 0x3E4989, 0x31688E, 0x26828E, 0x1F9E89, 0x35B779, 0x6DCD59, 0xB4DE2C,
    0xFDE725,
];
const PLASMA: &[u32] = &[
    0x0D0887, 0x4B03A1, 0x7D03A8, 0xA82296, 0xCB4679, 0xE56B5D, 0xF89441, 0xFDC328, 0xF0F921,
];
const INFERNO: &[u32] = &[
    0x000004, 0x210C4A, 0x56106E, 0x89226A, 0xBB3754, 0xE35932, 0xF98C0A, 0xF9C932, 0xFCFFA4,
];
const MAGMA: &[u32] = &[
    0x000004, 0x1D1147, 0x51127C, 0x822681, 0xB73779, 0xE75263, 0xFC8961, 0xFEC287, 0xFCFDBF,
];
const COOLWARM: &[u32] = &[0x3B4CC0, 0x8DB0FE, 0xDDDDDD, 0xF49A7B, 0xB40426];

/// Gradient tables for continuous values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuousPalette {
    #[default]
    BlueRed,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Coolwarm,
}

impl ContinuousPalette {
    pub const ALL: [ContinuousPalette; 6] = [
        ContinuousPalette::BlueRed,
        ContinuousPalette::Viridis,
        ContinuousPalette::Plasma,
        ContinuousPalette::Inferno,
        ContinuousPalette::Magma,
        ContinuousPalette::Coolwarm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContinuousPalette::BlueRed => "blue_red",
            ContinuousPalette::Viridis => "viridis",
            ContinuousPalette::Plasma => "plasma",
            ContinuousPalette::Inferno => "inferno",
            ContinuousPalette::Magma => "magma",
            ContinuousPalette::Coolwarm => "coolwarm",
        }
    }

    /// Build the gradient for this palette
    pub fn colormap(&self) -> Colormap {
        let table = match self {
            ContinuousPalette::BlueRed => BLUE_RED,
            ContinuousPalette::Viridis => VIRIDIS,
            ContinuousPalette::Plasma => PLASMA,
            ContinuousPalette::Inferno => INFERNO,
            ContinuousPalette::Magma => MAGMA,
            ContinuousPalette::Coolwarm => COOLWARM,
        };
        Colormap::from_hex_table(self.name(), table)
    }

    pub fn from_name(name: &str) -> CoreResult<Self> {
        let lower = name.to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == lower)
            .ok_or_else(|| CoreError::UnknownPalette(name.to_string()))
    }
}

// MARK: - Categorical palettes

const TABLEAU10: &[u32] = &[
    0x4E79A7, 0xF28E2B, 0xE15759, 0x76B7B2, 0x59A14F, 0xEDC948, 0xB07AA1, 0xFF9DA7, 0x9C755F,
    0xBAB0AC,
];
const SET1: &[u32] = &[
    0xE41A1C, 0x377EB8, 0x4DAF4A, 0x984EA3, 0xFF7F00, 0xFFFF33, 0xA65628, 0xF781BF, 0x999999,
];
const PASTEL: &[u32] = &[
    0xFBB4AE, 0xB3CDE3, 0xCCEBC5, 0xDECBE4, 0xFED9A6, 0xFFFFCC, 0xE5D8BD, 0xFDDAEC, 0xF2F2F2,
];

/// Fixed color lists for discrete values, cycled by category index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalPalette {
    #[default]
    Tableau10,
    Set1,
    Pastel,
}

impl CategoricalPalette {
    pub const ALL: [CategoricalPalette; 3] = [
        CategoricalPalette::Tableau10,
        CategoricalPalette::Set1,
        CategoricalPalette::Pastel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CategoricalPalette::Tableau10 => "tableau10",
            CategoricalPalette::Set1 => "set1",
            CategoricalPalette::Pastel => "pastel",
        }
    }

    fn table(&self) -> &'static [u32] {
        match self {
            CategoricalPalette::Tableau10 => TABLEAU10,
            CategoricalPalette::Set1 => SET1,
            CategoricalPalette::Pastel => PASTEL,
        }
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    /// Color for category `i`, wrapping around the palette
    pub fn color(&self, i: usize) -> Color {
        let table = self.table();
        Color::from_rgb_u32(table[i % table.len()])
    }

    pub fn from_name(name: &str) -> CoreResult<Self> {
        let lower = name.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == lower)
            .ok_or_else(|| CoreError::UnknownPalette(name.to_string()))
    }
}
