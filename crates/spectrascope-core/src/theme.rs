//! Host theme tokens
//!
//! The vector renderer can reference the host's theme directly
//! (`hsl(var(--primary))`) so it follows light/dark switches without a
//! re-resolve. GPU renderers cannot interpret CSS, so every token also carries
//! a concrete value that the GPU-safe encoding substitutes.

use serde::{Deserialize, Serialize};

use crate::colormap::Color;

/// Named theme colors used by the color engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeToken {
    /// Selection highlight and the base color of selection mode
    Primary,
    /// Neutral gray for "no value" / "not in any fold"
    Muted,
    /// Alert color for outliers
    Destructive,
    /// Stroke for pinned samples
    Pinned,
    /// Stroke for the hovered sample
    Hover,
}

impl ThemeToken {
    pub const ALL: [ThemeToken; 5] = [
        ThemeToken::Primary,
        ThemeToken::Muted,
        ThemeToken::Destructive,
        ThemeToken::Pinned,
        ThemeToken::Hover,
    ];

    /// CSS custom property name
    pub fn css_var(&self) -> &'static str {
        match self {
            ThemeToken::Primary => "--primary",
            ThemeToken::Muted => "--muted-foreground",
            ThemeToken::Destructive => "--destructive",
            ThemeToken::Pinned => "--pinned",
            ThemeToken::Hover => "--ring",
        }
    }

    /// Symbolic reference, e.g. `hsl(var(--primary))`
    pub fn css_reference(&self) -> String {
        format!("hsl(var({}))", self.css_var())
    }

    fn from_css_var(var: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.css_var() == var)
    }
}

/// Concrete values for every theme token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: Color,
    pub muted: Color,
    pub destructive: Color,
    pub pinned: Color,
    pub hover: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            primary: Color::from_rgb_u32(0x2563EB),
            muted: Color::from_rgb_u32(0x9CA3AF),
            destructive: Color::from_rgb_u32(0xEF4444),
            pinned: Color::from_rgb_u32(0xF59E0B),
            hover: Color::from_rgb_u32(0x111827),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color::from_rgb_u32(0x60A5FA),
            muted: Color::from_rgb_u32(0x6B7280),
            destructive: Color::from_rgb_u32(0xF87171),
            pinned: Color::from_rgb_u32(0xFBBF24),
            hover: Color::from_rgb_u32(0xF9FAFB),
        }
    }

    /// Concrete color for a token
    pub fn color(&self, token: ThemeToken) -> Color {
        match token {
            ThemeToken::Primary => self.primary,
            ThemeToken::Muted => self.muted,
            ThemeToken::Destructive => self.destructive,
            ThemeToken::Pinned => self.pinned,
            ThemeToken::Hover => self.hover,
        }
    }

    /// Decode any color string the engine emits back to a concrete color
    ///
    /// Accepts `#RRGGBB`, `hsl(h, s%, l%)` and `hsl(var(--token))`.
    pub fn decode(&self, s: &str) -> Option<Color> {
        let s = s.trim();
        if s.starts_with('#') {
            return Color::from_hex(s);
        }

        let inner = s.strip_prefix("hsl(")?.strip_suffix(')')?.trim();
        if let Some(var) = inner.strip_prefix("var(").and_then(|v| v.strip_suffix(')')) {
            return ThemeToken::from_css_var(var.trim()).map(|t| self.color(t));
        }

        let mut parts = inner.split(',').map(str::trim);
        let h: f32 = parts.next()?.parse().ok()?;
        let s: f32 = parts.next()?.strip_suffix('%')?.parse().ok()?;
        let l: f32 = parts.next()?.strip_suffix('%')?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Color::from_hsl(h, s / 100.0, l / 100.0))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
