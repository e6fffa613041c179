//! Selection state snapshot

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spectrascope_core::SampleIndex;

/// Active selection tool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    /// Single-point clicks; clicking the background clears
    #[default]
    Click,
    /// Rubber-band rectangle
    Box,
    /// Freehand polygon
    Lasso,
}

impl ToolMode {
    /// Whether drags produce area selections
    pub fn is_area(&self) -> bool {
        matches!(self, ToolMode::Box | ToolMode::Lasso)
    }
}

/// Read-only view of the store
///
/// The sets are shared, never mutated in place: every change installs a new
/// `Arc`, so observers can detect change with `Arc::ptr_eq`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Arc<BTreeSet<SampleIndex>>,
    pub pinned: Arc<BTreeSet<SampleIndex>>,
    /// At most one hovered sample
    pub hovered: Option<SampleIndex>,
    pub tool_mode: ToolMode,
    /// Incremented on every effective change
    pub revision: u64,
}

impl SelectionState {
    pub fn is_selected(&self, index: SampleIndex) -> bool {
        self.selected.contains(&index)
    }

    pub fn is_pinned(&self, index: SampleIndex) -> bool {
        self.pinned.contains(&index)
    }

    /// Index of the only selected sample, if exactly one is selected
    pub fn sole_selected(&self) -> Option<SampleIndex> {
        match self.selected.len() {
            1 => self.selected.first().copied(),
            _ => None,
        }
    }
}

/// Which part of the state a notification is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionChange {
    Selected,
    Pinned,
    Hovered,
    ToolMode,
    /// Dataset changed; everything was cleared
    Reset,
}

impl SelectionChange {
    /// Whether per-sample colors depend on this change
    pub fn affects_color(&self) -> bool {
        !matches!(self, SelectionChange::ToolMode)
    }
}
