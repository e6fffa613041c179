//! Read-only data snapshot consumed by color resolution
//!
//! A context lives for one render pass. It is rebuilt when upstream data
//! (targets, folds, metadata) changes; selection fields are refreshed from the
//! selection store before each pass by sharing its sets.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::config::TargetType;
use crate::error::{validation, CoreResult};
use crate::theme::Theme;
use crate::types::SampleIndex;

/// One metadata cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl MetadataValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Missing cells and non-finite numbers carry no value
    pub fn is_missing(&self) -> bool {
        match self {
            MetadataValue::Missing => true,
            MetadataValue::Number(n) => !n.is_finite(),
            MetadataValue::Text(s) => s.is_empty(),
        }
    }

    /// Display label, used as the category key
    pub fn label(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            MetadataValue::Number(n) => Some(n.to_string()),
            MetadataValue::Text(s) => Some(s.clone()),
            MetadataValue::Missing => None,
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::Number(n)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl<T: Into<MetadataValue>> From<Option<T>> for MetadataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Disjoint train/test membership for one cross-validation fold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSets {
    pub train: BTreeSet<SampleIndex>,
    pub test: BTreeSet<SampleIndex>,
}

impl PartitionSets {
    /// Partition from per-sample fold labels using the first fold only
    ///
    /// The first fold is the smallest non-negative label. Its samples form the
    /// test set, samples of every other fold form the train set, and samples
    /// labelled `-1` belong to neither.
    pub fn from_fold_labels(labels: &[i32]) -> Self {
        let Some(first) = labels.iter().copied().filter(|&l| l >= 0).min() else {
            return Self::default();
        };

        let mut sets = Self::default();
        for (i, &label) in labels.iter().enumerate() {
            if label == first {
                sets.test.insert(i);
            } else if label >= 0 {
                sets.train.insert(i);
            }
        }
        sets
    }

    /// Partition from upstream (train, test) index lists per fold
    ///
    /// Only the first fold is used: k-fold test sets overlap across folds and
    /// must not be unioned. Any index listed in both sets counts as test.
    pub fn from_folds(folds: &[(Vec<SampleIndex>, Vec<SampleIndex>)]) -> Self {
        let Some((train, test)) = folds.first() else {
            return Self::default();
        };
        let test: BTreeSet<SampleIndex> = test.iter().copied().collect();
        let train = train.iter().copied().filter(|i| !test.contains(i)).collect();
        Self { train, test }
    }
}

/// Snapshot of everything color resolution may read
#[derive(Debug, Clone, Default)]
pub struct ColorContext {
    /// Number of samples N
    pub sample_count: usize,

    /// Per-sample target values
    pub y: Option<Vec<f64>>,
    pub y_min: f64,
    pub y_max: f64,

    /// Target type detected upstream
    pub detected_target_type: Option<TargetType>,

    /// Per-sample fold label, `-1` for "not in any fold"
    pub fold_labels: Vec<i32>,

    pub train_indices: BTreeSet<SampleIndex>,
    pub test_indices: BTreeSet<SampleIndex>,

    /// Named per-sample metadata columns
    pub metadata: HashMap<String, Vec<MetadataValue>>,

    pub selected_samples: Arc<BTreeSet<SampleIndex>>,
    pub pinned_samples: Arc<BTreeSet<SampleIndex>>,
    pub hovered_sample: Option<SampleIndex>,

    /// Externally computed outliers
    pub outlier_indices: BTreeSet<SampleIndex>,

    /// Indices that remain visible; `None` shows everything
    pub display_filter: Option<BTreeSet<SampleIndex>>,

    /// Host theme used for concrete color values
    pub theme: Theme,
}

impl ColorContext {
    pub fn new(sample_count: usize) -> Self {
        Self {
            sample_count,
            ..Default::default()
        }
    }

    /// Attach target values; the range is taken over finite values
    pub fn with_targets(mut self, y: Vec<f64>) -> CoreResult<Self> {
        validation::validate_column_length("y", self.sample_count, y.len())?;
        let (min, max) = y
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if min <= max {
            self.y_min = min;
            self.y_max = max;
        }
        self.y = Some(y);
        Ok(self)
    }

    /// Override the normalization range of the target
    pub fn with_target_range(mut self, min: f64, max: f64) -> Self {
        self.y_min = min;
        self.y_max = max;
        self
    }

    pub fn with_target_type(mut self, target_type: TargetType) -> Self {
        self.detected_target_type = Some(target_type);
        self
    }

    /// Attach fold labels and derive the first-fold partition from them
    pub fn with_fold_labels(mut self, labels: Vec<i32>) -> CoreResult<Self> {
        validation::validate_column_length("fold_labels", self.sample_count, labels.len())?;
        let partition = PartitionSets::from_fold_labels(&labels);
        self.fold_labels = labels;
        Ok(self.with_partition(partition))
    }

    pub fn with_partition(mut self, partition: PartitionSets) -> Self {
        self.train_indices = partition.train;
        self.test_indices = partition.test;
        self
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        values: Vec<MetadataValue>,
    ) -> CoreResult<Self> {
        let key = key.into();
        validation::validate_column_length(&key, self.sample_count, values.len())?;
        self.metadata.insert(key, values);
        Ok(self)
    }

    pub fn with_outliers(mut self, outliers: impl IntoIterator<Item = SampleIndex>) -> Self {
        self.outlier_indices = outliers.into_iter().collect();
        self
    }

    pub fn with_display_filter(mut self, visible: Option<BTreeSet<SampleIndex>>) -> Self {
        self.display_filter = visible;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Share the selection store's current sets
    pub fn with_selection(
        mut self,
        selected: Arc<BTreeSet<SampleIndex>>,
        pinned: Arc<BTreeSet<SampleIndex>>,
        hovered: Option<SampleIndex>,
    ) -> Self {
        self.sync_selection(selected, pinned, hovered);
        self
    }

    /// In-place variant of [`ColorContext::with_selection`] used between frames
    pub fn sync_selection(
        &mut self,
        selected: Arc<BTreeSet<SampleIndex>>,
        pinned: Arc<BTreeSet<SampleIndex>>,
        hovered: Option<SampleIndex>,
    ) {
        self.selected_samples = selected;
        self.pinned_samples = pinned;
        self.hovered_sample = hovered;
    }

    pub fn is_selected(&self, index: SampleIndex) -> bool {
        self.selected_samples.contains(&index)
    }

    pub fn is_pinned(&self, index: SampleIndex) -> bool {
        self.pinned_samples.contains(&index)
    }

    pub fn is_hovered(&self, index: SampleIndex) -> bool {
        self.hovered_sample == Some(index)
    }

    /// Any sample selected or pinned
    pub fn has_selection(&self) -> bool {
        !self.selected_samples.is_empty() || !self.pinned_samples.is_empty()
    }

    /// Not excluded by the display filter
    pub fn is_visible(&self, index: SampleIndex) -> bool {
        index < self.sample_count
            && self
                .display_filter
                .as_ref()
                .map_or(true, |visible| visible.contains(&index))
    }

    pub fn target(&self, index: SampleIndex) -> Option<f64> {
        self.y
            .as_ref()
            .and_then(|y| y.get(index).copied())
            .filter(|v| v.is_finite())
    }

    pub fn metadata_column(&self, key: &str) -> Option<&[MetadataValue]> {
        self.metadata.get(key).map(Vec::as_slice)
    }
}
