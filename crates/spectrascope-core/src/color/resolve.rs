//! Color resolution
//!
//! A [`ColorResolver`] makes every decision that depends on global context
//! (target type, class list, metadata column scale) once per pass, then
//! resolves samples independently. Each mode produces a [`Paint`]; hover, pin
//! and selection overlays are layered on top as strokes, and the display
//! filter marks samples hidden. Encoding happens last, so the symbolic and
//! GPU-safe outputs can only differ in their string form.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::config::{ColorMode, GlobalColorConfig, TargetType};
use crate::color::context::{ColorContext, MetadataValue};
use crate::color::paint::{ColorEncoding, ColorResult, Paint, PaintColor, Stroke};
use crate::colormap::Colormap;
use crate::theme::ThemeToken;
use crate::types::SampleIndex;

/// Added to value ranges so constant columns normalize without dividing by zero
pub const NORMALIZE_EPSILON: f64 = 1e-9;

/// Hue step of the index mode, in degrees
pub const GOLDEN_ANGLE: f64 = 137.508;

const INDEX_SATURATION: f32 = 65.0;
const INDEX_LIGHTNESS: f32 = 50.0;

/// Draw order of the layers
pub mod z_order {
    pub const BASE: u8 = 0;
    pub const OUTLIER: u8 = 1;
    pub const SELECTED: u8 = 2;
    pub const PINNED: u8 = 3;
    pub const HOVERED: u8 = 4;
}

/// Map `v` into `[0, 1]` against `[min, max]`
pub fn normalize(v: f64, min: f64, max: f64) -> f32 {
    let t = (v - min) / (max - min + NORMALIZE_EPSILON);
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0) as f32
}

/// Deterministic string hash used to key categorical metadata colors
///
/// Stable for equal strings within and across runs; it says nothing about
/// which palette slot a value gets in a different dataset's palette choice.
pub fn hash_category(value: &str) -> u32 {
    value
        .chars()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
        .unsigned_abs()
}

/// Hue assigned to a sample index, rounded to hundredths of a degree
pub fn index_hue(index: SampleIndex) -> f32 {
    let hue = (index as f64 * GOLDEN_ANGLE) % 360.0;
    ((hue * 100.0).round() / 100.0) as f32
}

/// One row of a legend, styled the way matching samples are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub opacity: f32,
    pub stroke: Option<String>,
}

/// How a metadata column is colored, decided from the whole column
#[derive(Debug, Clone, PartialEq)]
enum MetadataScale {
    Categorical,
    Continuous { min: f64, max: f64 },
}

/// Per-pass strategy chosen from the mode and global context
#[derive(Debug, Clone)]
enum Strategy<'a> {
    TargetContinuous { colormap: Colormap },
    TargetCategorical { classes: Vec<f64> },
    Index,
    Partition,
    Fold,
    Metadata {
        column: &'a [MetadataValue],
        scale: MetadataScale,
        colormap: Colormap,
    },
    Selection { fill: PaintColor },
    Outlier,
    /// Required data is absent; everything is neutral
    Neutral,
}

/// Resolves colors for one (config, context) pair
#[derive(Debug, Clone)]
pub struct ColorResolver<'a> {
    config: &'a GlobalColorConfig,
    context: &'a ColorContext,
    target_type: TargetType,
    strategy: Strategy<'a>,
}

impl<'a> ColorResolver<'a> {
    pub fn new(config: &'a GlobalColorConfig, context: &'a ColorContext) -> Self {
        let target_type = config
            .target_type_override
            .or(context.detected_target_type)
            .unwrap_or(TargetType::Continuous);

        let strategy = match &config.mode {
            ColorMode::Target => match (&context.y, target_type) {
                (None, _) => {
                    debug!("no target values in context, target mode falls back to neutral");
                    Strategy::Neutral
                }
                (Some(_), TargetType::Continuous) => Strategy::TargetContinuous {
                    colormap: config.continuous_palette.colormap(),
                },
                (Some(y), TargetType::Categorical) => Strategy::TargetCategorical {
                    classes: sorted_unique(y.iter().copied()),
                },
            },
            ColorMode::Index => Strategy::Index,
            ColorMode::Partition => Strategy::Partition,
            ColorMode::Fold => Strategy::Fold,
            ColorMode::Metadata { key } => match context.metadata_column(key) {
                Some(column) => Strategy::Metadata {
                    column,
                    scale: metadata_scale(column, config.metadata_categorical_threshold),
                    colormap: config.continuous_palette.colormap(),
                },
                None => {
                    warn!(key = %key, "metadata column not found, coloring neutral");
                    Strategy::Neutral
                }
            },
            ColorMode::Selection => Strategy::Selection {
                fill: config
                    .selection_color
                    .map(PaintColor::Concrete)
                    .unwrap_or(PaintColor::Themed(ThemeToken::Primary)),
            },
            ColorMode::Outlier => Strategy::Outlier,
        };

        Self {
            config,
            context,
            target_type,
            strategy,
        }
    }

    /// Target type in effect for this pass
    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn config(&self) -> &GlobalColorConfig {
        self.config
    }

    pub fn context(&self) -> &ColorContext {
        self.context
    }

    /// Full visual decision for a sample, before encoding
    pub fn paint(&self, index: SampleIndex) -> Paint {
        let ctx = self.context;
        let mut paint = self.base_paint(index);

        if !ctx.is_visible(index) {
            paint.hidden = true;
            return paint;
        }

        if ctx.is_selected(index) {
            paint.opacity = 1.0;
            paint.stroke = Some(Stroke {
                color: PaintColor::Themed(ThemeToken::Primary),
                width: self.config.selected_stroke_width,
            });
            paint.z_index = paint.z_index.max(z_order::SELECTED);
        }
        if ctx.is_pinned(index) {
            paint.opacity = 1.0;
            paint.stroke = Some(Stroke {
                color: PaintColor::Themed(ThemeToken::Pinned),
                width: self.config.pinned_stroke_width,
            });
            paint.z_index = paint.z_index.max(z_order::PINNED);
        }
        if ctx.is_hovered(index) {
            paint.stroke = Some(Stroke {
                color: PaintColor::Themed(ThemeToken::Hover),
                width: self.config.hover_stroke_width,
            });
            paint.size_scale = self.config.hover_size_scale;
            paint.z_index = z_order::HOVERED;
        }
        paint
    }

    pub fn resolve(&self, index: SampleIndex, encoding: ColorEncoding) -> ColorResult {
        self.paint(index).encode(encoding, &self.context.theme)
    }

    /// Resolve every sample `0..N`
    pub fn resolve_all(&self, encoding: ColorEncoding) -> Vec<ColorResult> {
        let n = self.context.sample_count;

        #[cfg(feature = "parallel")]
        let results = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|i| self.resolve(i, encoding))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results = (0..n).map(|i| self.resolve(i, encoding)).collect();

        results
    }

    /// Legend rows describing the active mode
    pub fn legend(&self, encoding: ColorEncoding) -> Vec<LegendEntry> {
        let theme = &self.context.theme;
        let entry = |label: String, color: PaintColor| LegendEntry {
            label,
            color: color.encode(encoding, theme),
            opacity: self.config.point_opacity,
            stroke: None,
        };
        let palette = self.config.categorical_palette;

        match &self.strategy {
            Strategy::TargetContinuous { colormap } => {
                gradient_legend(colormap, self.context.y_min, self.context.y_max)
                    .into_iter()
                    .map(|(label, c)| entry(label, PaintColor::Concrete(c)))
                    .collect()
            }
            Strategy::TargetCategorical { classes } => classes
                .iter()
                .enumerate()
                .map(|(i, class)| entry(class.to_string(), PaintColor::Concrete(palette.color(i))))
                .collect(),
            Strategy::Index => Vec::new(),
            Strategy::Partition => vec![
                entry("Train".into(), PaintColor::Concrete(palette.color(0))),
                entry("Test".into(), PaintColor::Concrete(palette.color(1))),
            ],
            Strategy::Fold => {
                let labels = &self.context.fold_labels;
                let folds: BTreeSet<usize> = labels
                    .iter()
                    .filter_map(|&label| usize::try_from(label).ok())
                    .collect();
                let mut entries: Vec<LegendEntry> = folds
                    .into_iter()
                    .map(|fold| {
                        entry(
                            format!("Fold {fold}"),
                            PaintColor::Concrete(palette.color(fold)),
                        )
                    })
                    .collect();
                if labels.iter().any(|&label| label < 0) {
                    entries.push(entry(
                        "Not in fold".into(),
                        PaintColor::Themed(ThemeToken::Muted),
                    ));
                }
                entries
            }
            Strategy::Metadata {
                column,
                scale: MetadataScale::Categorical,
                ..
            } => {
                let labels: BTreeSet<String> =
                    column.iter().filter_map(MetadataValue::label).collect();
                labels
                    .into_iter()
                    .map(|label| {
                        let color = self.hashed_color(&label);
                        entry(label, color)
                    })
                    .collect()
            }
            Strategy::Metadata {
                scale: MetadataScale::Continuous { min, max },
                colormap,
                ..
            } => gradient_legend(colormap, *min, *max)
                .into_iter()
                .map(|(label, c)| entry(label, PaintColor::Concrete(c)))
                .collect(),
            Strategy::Selection { fill } => vec![
                LegendEntry {
                    opacity: 1.0,
                    stroke: Some(PaintColor::Themed(ThemeToken::Primary).encode(encoding, theme)),
                    ..entry("Selected".into(), *fill)
                },
                LegendEntry {
                    opacity: self.config.unselected_opacity,
                    ..entry("Unselected".into(), *fill)
                },
            ],
            Strategy::Outlier => vec![
                entry("Outlier".into(), PaintColor::Themed(ThemeToken::Destructive)),
                entry("Inlier".into(), PaintColor::Themed(ThemeToken::Muted)),
            ],
            Strategy::Neutral => Vec::new(),
        }
    }

    fn base_paint(&self, index: SampleIndex) -> Paint {
        let ctx = self.context;
        let config = self.config;
        let opacity = config.point_opacity;
        let neutral = Paint::fill(PaintColor::Themed(ThemeToken::Muted), opacity);

        match &self.strategy {
            Strategy::TargetContinuous { colormap } => match ctx.target(index) {
                Some(v) => Paint::fill(
                    PaintColor::Concrete(colormap.sample(normalize(v, ctx.y_min, ctx.y_max))),
                    opacity,
                ),
                None => neutral,
            },
            Strategy::TargetCategorical { classes } => ctx
                .target(index)
                .and_then(|v| classes.binary_search_by(|c| c.total_cmp(&v)).ok())
                .map(|rank| {
                    Paint::fill(
                        PaintColor::Concrete(config.categorical_palette.color(rank)),
                        opacity,
                    )
                })
                .unwrap_or(neutral),
            Strategy::Index => Paint::fill(
                PaintColor::Hsl {
                    h: index_hue(index),
                    s: INDEX_SATURATION,
                    l: INDEX_LIGHTNESS,
                },
                opacity,
            ),
            Strategy::Partition => {
                if ctx.test_indices.contains(&index) {
                    Paint::fill(PaintColor::Concrete(config.categorical_palette.color(1)), opacity)
                } else if ctx.train_indices.contains(&index) {
                    Paint::fill(PaintColor::Concrete(config.categorical_palette.color(0)), opacity)
                } else {
                    neutral
                }
            }
            Strategy::Fold => ctx
                .fold_labels
                .get(index)
                .and_then(|&label| usize::try_from(label).ok())
                .map(|fold| {
                    Paint::fill(
                        PaintColor::Concrete(config.categorical_palette.color(fold)),
                        opacity,
                    )
                })
                .unwrap_or(neutral),
            Strategy::Metadata {
                column,
                scale,
                colormap,
            } => {
                let Some(value) = column.get(index).filter(|v| !v.is_missing()) else {
                    return neutral;
                };
                match scale {
                    MetadataScale::Categorical => match value.label() {
                        Some(label) => Paint::fill(self.hashed_color(&label), opacity),
                        None => neutral,
                    },
                    MetadataScale::Continuous { min, max } => match value.as_number() {
                        Some(v) => Paint::fill(
                            PaintColor::Concrete(colormap.sample(normalize(v, *min, *max))),
                            opacity,
                        ),
                        None => neutral,
                    },
                }
            }
            Strategy::Selection { fill } => {
                let opacity = if ctx.is_selected(index) || ctx.is_pinned(index) {
                    1.0
                } else if ctx.has_selection() {
                    config.unselected_opacity
                } else {
                    opacity
                };
                Paint::fill(*fill, opacity)
            }
            Strategy::Outlier => {
                if ctx.outlier_indices.contains(&index) {
                    let mut paint = Paint::fill(PaintColor::Themed(ThemeToken::Destructive), 1.0);
                    paint.z_index = z_order::OUTLIER;
                    paint
                } else {
                    neutral
                }
            }
            Strategy::Neutral => neutral,
        }
    }

    fn hashed_color(&self, label: &str) -> PaintColor {
        let palette = self.config.categorical_palette;
        let slot = hash_category(label) as usize % palette.len().max(1);
        PaintColor::Concrete(palette.color(slot))
    }
}

/// Symbolic resolution of one sample, for legends and export annotation
pub fn resolve(
    index: SampleIndex,
    config: &GlobalColorConfig,
    context: &ColorContext,
) -> ColorResult {
    ColorResolver::new(config, context).resolve(index, ColorEncoding::Symbolic)
}

/// GPU-safe resolution of one sample
pub fn resolve_gpu(
    index: SampleIndex,
    config: &GlobalColorConfig,
    context: &ColorContext,
) -> ColorResult {
    ColorResolver::new(config, context).resolve(index, ColorEncoding::GpuSafe)
}

/// Resolve all samples in one pass
pub fn resolve_all(
    config: &GlobalColorConfig,
    context: &ColorContext,
    encoding: ColorEncoding,
) -> Vec<ColorResult> {
    ColorResolver::new(config, context).resolve_all(encoding)
}

fn sorted_unique(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

fn metadata_scale(column: &[MetadataValue], categorical_threshold: usize) -> MetadataScale {
    let present = || column.iter().filter(|v| !v.is_missing());
    if present().any(|v| matches!(v, MetadataValue::Text(_))) {
        return MetadataScale::Categorical;
    }

    let distinct = sorted_unique(present().filter_map(MetadataValue::as_number));
    match (distinct.first(), distinct.last()) {
        (Some(&min), Some(&max)) if distinct.len() > categorical_threshold => {
            MetadataScale::Continuous { min, max }
        }
        _ => MetadataScale::Categorical,
    }
}

fn gradient_legend(
    colormap: &Colormap,
    min: f64,
    max: f64,
) -> Vec<(String, crate::colormap::Color)> {
    let mid = min + (max - min) / 2.0;
    [min, mid, max]
        .into_iter()
        .map(|v| (format!("{v:.2}"), colormap.sample(normalize(v, min, max))))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::colormap::{CategoricalPalette, Color, ContinuousPalette};

    fn target_context() -> ColorContext {
        let y: Vec<f64> = (0..=100).map(f64::from).collect();
        ColorContext::new(101).with_targets(y).unwrap()
    }

    #[test]
    fn test_normalize_constant_range() {
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
        assert!(normalize(10.0, 0.0, 10.0) > 0.999);
        assert_eq!(normalize(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_hash_is_java_style() {
        assert_eq!(hash_category(""), 0);
        assert_eq!(hash_category("a"), 97);
        assert_eq!(hash_category("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_target_extremes_and_midpoint() {
        let ctx = target_context();
        let config = GlobalColorConfig::default();
        let cmap = ContinuousPalette::BlueRed.colormap();

        assert_eq!(resolve_gpu(0, &config, &ctx).color, cmap.start().to_hex());
        assert_eq!(resolve_gpu(100, &config, &ctx).color, cmap.end().to_hex());
        assert_eq!(resolve_gpu(50, &config, &ctx).color, cmap.sample(0.5).to_hex());
    }

    #[test]
    fn test_categorical_target_uses_class_rank() {
        let ctx = ColorContext::new(4)
            .with_targets(vec![2.0, 0.0, 1.0, 2.0])
            .unwrap()
            .with_target_type(TargetType::Categorical);
        let config = GlobalColorConfig::default();
        let resolver = ColorResolver::new(&config, &ctx);
        assert_eq!(resolver.target_type(), TargetType::Categorical);

        let palette = CategoricalPalette::default();
        let gpu = |i| resolver.resolve(i, ColorEncoding::GpuSafe).color;
        assert_eq!(gpu(1), palette.color(0).to_hex());
        assert_eq!(gpu(0), palette.color(2).to_hex());
        assert_eq!(gpu(0), gpu(3));
    }

    #[test]
    fn test_override_beats_detected_type() {
        let ctx = target_context().with_target_type(TargetType::Categorical);
        let config = GlobalColorConfig::default().with_target_type(TargetType::Continuous);
        assert_eq!(ColorResolver::new(&config, &ctx).target_type(), TargetType::Continuous);
    }

    #[test]
    fn test_fold_unassigned_is_neutral() {
        let ctx = ColorContext::new(3).with_fold_labels(vec![0, -1, 3]).unwrap();
        let config = GlobalColorConfig::new(ColorMode::Fold);
        let palette = config.categorical_palette;
        assert_eq!(resolve(1, &config, &ctx).color, "hsl(var(--muted-foreground))");
        assert_eq!(resolve(2, &config, &ctx).color, palette.color(3).to_hex());
    }

    #[test]
    fn test_metadata_text_hash_is_stable_across_samples() {
        let values = vec!["A".into(), "B".into(), "A".into(), MetadataValue::Missing];
        let ctx = ColorContext::new(4).with_metadata("batch", values).unwrap();
        let config = GlobalColorConfig::metadata("batch");
        let r = ColorResolver::new(&config, &ctx);
        let c = |i| r.resolve(i, ColorEncoding::GpuSafe).color;
        assert_eq!(c(0), c(2));
        assert_eq!(c(3), ctx.theme.muted.to_hex());
    }

    #[test]
    fn test_metadata_many_numbers_is_continuous() {
        let values: Vec<MetadataValue> = (0..20).map(|i| MetadataValue::from(i as f64)).collect();
        let ctx = ColorContext::new(20).with_metadata("temp", values).unwrap();
        let config = GlobalColorConfig::metadata("temp");
        let cmap = config.continuous_palette.colormap();
        assert_eq!(resolve_gpu(0, &config, &ctx).color, cmap.start().to_hex());
        assert_eq!(resolve_gpu(19, &config, &ctx).color, cmap.end().to_hex());
    }

    #[test]
    fn test_missing_metadata_column_is_neutral() {
        let ctx = ColorContext::new(2);
        let config = GlobalColorConfig::metadata("nope");
        assert_eq!(resolve_gpu(0, &config, &ctx).color, ctx.theme.muted.to_hex());
    }

    #[test]
    fn test_selection_mode_dims_unselected() {
        let ctx = ColorContext::new(3).with_selection(
            Arc::new(BTreeSet::from([0])),
            Arc::new(BTreeSet::from([2])),
            None,
        );
        let config = GlobalColorConfig::new(ColorMode::Selection);
        let all = resolve_all(&config, &ctx, ColorEncoding::Symbolic);

        assert_eq!(all[0].opacity, 1.0);
        assert_eq!(all[1].opacity, 0.25);
        assert_eq!(all[2].opacity, 1.0);
        assert_eq!(all[0].color, all[1].color);
        assert_eq!(all[0].stroke.as_deref(), Some("hsl(var(--primary))"));
        assert_eq!(all[2].stroke.as_deref(), Some("hsl(var(--pinned))"));
    }

    #[test]
    fn test_selection_color_override() {
        let ctx = ColorContext::new(1);
        let config = GlobalColorConfig::new(ColorMode::Selection)
            .with_selection_color(Color::from_rgb_u32(0x00FF00));
        assert_eq!(resolve(0, &config, &ctx).color, "#00FF00");
    }

    #[test]
    fn test_outlier_above_base() {
        let ctx = ColorContext::new(2).with_outliers([1]);
        let config = GlobalColorConfig::new(ColorMode::Outlier);
        let r = resolve(1, &config, &ctx);
        assert_eq!(r.color, "hsl(var(--destructive))");
        assert!(r.z_index > resolve(0, &config, &ctx).z_index);
    }

    #[test]
    fn test_hover_is_overlay_not_substitution() {
        let base = target_context();
        let hovered = base.clone().with_selection(Default::default(), Default::default(), Some(30));
        let config = GlobalColorConfig::default();

        let before = resolve(30, &config, &base);
        let after = resolve(30, &config, &hovered);
        assert_eq!(before.color, after.color);
        assert_eq!(after.stroke.as_deref(), Some("hsl(var(--ring))"));
        assert_eq!(after.size_scale, config.hover_size_scale);
        assert_eq!(after.z_index, z_order::HOVERED);
    }

    #[test]
    fn test_display_filter_hides() {
        let ctx = target_context().with_display_filter(Some(BTreeSet::from([1, 2])));
        let config = GlobalColorConfig::default();
        assert!(resolve(0, &config, &ctx).hidden);
        assert!(!resolve(1, &config, &ctx).hidden);
        assert!(resolve(500, &config, &ctx).hidden);
    }

    #[test]
    fn test_index_mode_symbolic_triple() {
        let ctx = ColorContext::new(3);
        let config = GlobalColorConfig::new(ColorMode::Index);
        assert_eq!(resolve(0, &config, &ctx).color, "hsl(0.00, 65%, 50%)");
        assert_eq!(resolve(1, &config, &ctx).color, "hsl(137.51, 65%, 50%)");
        assert!(resolve_gpu(1, &config, &ctx).color.starts_with('#'));
    }

    #[test]
    fn test_partition_legend() {
        let ctx = ColorContext::new(10)
            .with_fold_labels((0..10).map(|i| i % 5).collect())
            .unwrap();
        let config = GlobalColorConfig::new(ColorMode::Partition);
        let legend = ColorResolver::new(&config, &ctx).legend(ColorEncoding::GpuSafe);
        let labels: Vec<_> = legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Train", "Test"]);
    }

    #[test]
    fn test_fold_legend_single_unassigned_row() {
        let ctx = ColorContext::new(6)
            .with_fold_labels(vec![0, -1, 1, -1, 0, -1])
            .unwrap();
        let config = GlobalColorConfig::new(ColorMode::Fold);
        let legend = ColorResolver::new(&config, &ctx).legend(ColorEncoding::Symbolic);
        let labels: Vec<_> = legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Fold 0", "Fold 1", "Not in fold"]);
    }

    #[test]
    fn test_selection_legend_rows_differ() {
        let ctx = ColorContext::new(4);
        let config = GlobalColorConfig::new(ColorMode::Selection).with_unselected_opacity(0.2);
        let legend = ColorResolver::new(&config, &ctx).legend(ColorEncoding::GpuSafe);
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].opacity, 1.0);
        assert!(legend[0].stroke.is_some());
        assert_eq!(legend[1].opacity, 0.2);
        assert_eq!(legend[1].stroke, None);
        assert_ne!(legend[0], legend[1]);
    }
}
