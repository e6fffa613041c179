//! Global color configuration
//!
//! One configuration drives every chart. The mode is a closed set of
//! variants; the metadata column key only exists on the metadata variant.

use serde::{Deserialize, Serialize};

use crate::colormap::{CategoricalPalette, Color, ContinuousPalette};
use crate::error::{validation, CoreResult};

/// The semantic field currently driving per-sample color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorMode {
    /// Target (Y) value through the continuous palette, or by class when the
    /// target is categorical
    #[default]
    Target,
    /// Dataset order through a fixed hue rotation
    Index,
    /// Train/test membership of the first fold
    Partition,
    /// Cross-validation fold label
    Fold,
    /// A metadata column
    Metadata { key: String },
    /// Selection membership; unselected samples are dimmed, not recolored
    Selection,
    /// Membership in the externally supplied outlier set
    Outlier,
}

impl ColorMode {
    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Target => "target",
            ColorMode::Index => "index",
            ColorMode::Partition => "partition",
            ColorMode::Fold => "fold",
            ColorMode::Metadata { .. } => "metadata",
            ColorMode::Selection => "selection",
            ColorMode::Outlier => "outlier",
        }
    }

    /// Metadata column key, only for the metadata mode
    pub fn metadata_key(&self) -> Option<&str> {
        match self {
            ColorMode::Metadata { key } => Some(key.as_str()),
            _ => None,
        }
    }
}

/// Whether the target column is a regression value or a class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Continuous,
    Categorical,
}

/// Color configuration shared by all charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalColorConfig {
    /// Active color mode
    pub mode: ColorMode,

    /// Gradient used for continuous values
    pub continuous_palette: ContinuousPalette,

    /// Color list used for discrete values
    pub categorical_palette: CategoricalPalette,

    /// User override of the detected target type
    pub target_type_override: Option<TargetType>,

    /// Base color in selection mode (theme primary when unset)
    pub selection_color: Option<Color>,

    /// Opacity of samples without any highlight
    pub point_opacity: f32,

    /// Opacity of unselected samples in selection mode
    pub unselected_opacity: f32,

    pub selected_stroke_width: f32,
    pub pinned_stroke_width: f32,
    pub hover_stroke_width: f32,

    /// Marker size multiplier for the hovered sample
    pub hover_size_scale: f32,

    /// Numeric metadata columns with at most this many distinct values are
    /// colored as categories
    pub metadata_categorical_threshold: usize,
}

impl Default for GlobalColorConfig {
    fn default() -> Self {
        Self {
            mode: ColorMode::default(),
            continuous_palette: ContinuousPalette::default(),
            categorical_palette: CategoricalPalette::default(),
            target_type_override: None,
            selection_color: None,
            point_opacity: 0.85,
            unselected_opacity: 0.25,
            selected_stroke_width: 1.5,
            pinned_stroke_width: 2.0,
            hover_stroke_width: 2.5,
            hover_size_scale: 1.5,
            metadata_categorical_threshold: 10,
        }
    }
}

impl GlobalColorConfig {
    /// Create a configuration for a mode
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Color by a metadata column
    pub fn metadata(key: impl Into<String>) -> Self {
        Self::new(ColorMode::Metadata { key: key.into() })
    }

    pub fn with_continuous_palette(mut self, palette: ContinuousPalette) -> Self {
        self.continuous_palette = palette;
        self
    }

    pub fn with_categorical_palette(mut self, palette: CategoricalPalette) -> Self {
        self.categorical_palette = palette;
        self
    }

    pub fn with_target_type(mut self, target_type: TargetType) -> Self {
        self.target_type_override = Some(target_type);
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = Some(color);
        self
    }

    pub fn with_unselected_opacity(mut self, opacity: f32) -> Self {
        self.unselected_opacity = opacity;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> CoreResult<()> {
        validation::validate_opacity("point_opacity", self.point_opacity)?;
        validation::validate_opacity("unselected_opacity", self.unselected_opacity)?;
        Ok(())
    }

    /// Serialize for persistence by the host
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
