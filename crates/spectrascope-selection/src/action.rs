//! Selection action resolver
//!
//! Pure functions from a completed gesture, the modifier flags and the
//! current selection to a declarative [`SelectionAction`]. Point clicks and
//! area gestures share the modifier table but differ in one rule: a click on
//! the only selected sample deselects it, while an area gesture never
//! resolves to [`SelectionAction::Clear`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use spectrascope_core::SampleIndex;

use crate::input::SelectionModifiers;

/// What to do to the store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "indices", rename_all = "snake_case")]
pub enum SelectionAction {
    Replace(Vec<SampleIndex>),
    Add(Vec<SampleIndex>),
    /// Flip membership of each index individually
    Toggle(Vec<SampleIndex>),
    Clear,
}

impl SelectionAction {
    pub fn indices(&self) -> &[SampleIndex] {
        match self {
            SelectionAction::Replace(indices)
            | SelectionAction::Add(indices)
            | SelectionAction::Toggle(indices) => indices,
            SelectionAction::Clear => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SelectionAction::Replace(_) => "replace",
            SelectionAction::Add(_) => "add",
            SelectionAction::Toggle(_) => "toggle",
            SelectionAction::Clear => "clear",
        }
    }
}

/// A single-click hit on one sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointHit {
    pub index: SampleIndex,
}

/// Samples inside a completed lasso or box
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaHit {
    pub indices: Vec<SampleIndex>,
}

impl AreaHit {
    pub fn new(indices: Vec<SampleIndex>) -> Self {
        Self { indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Resolve a single click
///
/// `shift` adds, `ctrl` toggles (shift wins when both are held). Without
/// modifiers, clicking the only selected sample clears; anything else
/// replaces.
pub fn compute_selection_action(
    hit: PointHit,
    current: &BTreeSet<SampleIndex>,
    modifiers: SelectionModifiers,
) -> SelectionAction {
    if modifiers.shift {
        SelectionAction::Add(vec![hit.index])
    } else if modifiers.ctrl {
        SelectionAction::Toggle(vec![hit.index])
    } else if current.len() == 1 && current.contains(&hit.index) {
        SelectionAction::Clear
    } else {
        SelectionAction::Replace(vec![hit.index])
    }
}

/// Resolve a completed area gesture
///
/// Same modifier table as clicks, but re-dragging over the current selection
/// never clears it. Under `ctrl` each index is toggled on its own: selected
/// ones leave, the rest join.
pub fn compute_area_selection_action(
    hit: &AreaHit,
    _current: &BTreeSet<SampleIndex>,
    modifiers: SelectionModifiers,
) -> SelectionAction {
    let mut indices = hit.indices.clone();
    indices.sort_unstable();
    indices.dedup();

    if modifiers.shift {
        SelectionAction::Add(indices)
    } else if modifiers.ctrl {
        SelectionAction::Toggle(indices)
    } else {
        SelectionAction::Replace(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_sole_selected_clears() {
        let current = BTreeSet::from([4]);
        let action =
            compute_selection_action(PointHit { index: 4 }, &current, SelectionModifiers::NONE);
        assert_eq!(action, SelectionAction::Clear);
    }

    #[test]
    fn test_click_member_of_larger_selection_replaces() {
        let current = BTreeSet::from([4, 5]);
        let action =
            compute_selection_action(PointHit { index: 4 }, &current, SelectionModifiers::NONE);
        assert_eq!(action, SelectionAction::Replace(vec![4]));
    }

    #[test]
    fn test_shift_beats_ctrl() {
        let both = SelectionModifiers { shift: true, ctrl: true };
        let action = compute_selection_action(PointHit { index: 1 }, &BTreeSet::new(), both);
        assert_eq!(action, SelectionAction::Add(vec![1]));
    }

    #[test]
    fn test_area_same_region_does_not_clear() {
        let current = BTreeSet::from([1, 2]);
        let hit = AreaHit::new(vec![2, 1]);
        let action = compute_area_selection_action(&hit, &current, SelectionModifiers::NONE);
        assert_eq!(action, SelectionAction::Replace(vec![1, 2]));
    }

    #[test]
    fn test_area_dedups_indices() {
        let hit = AreaHit::new(vec![3, 3, 1]);
        let action =
            compute_area_selection_action(&hit, &BTreeSet::new(), SelectionModifiers::CTRL);
        assert_eq!(action, SelectionAction::Toggle(vec![1, 3]));
    }

    #[test]
    fn test_clear_has_no_indices() {
        assert!(SelectionAction::Clear.indices().is_empty());
        assert_eq!(SelectionAction::Toggle(vec![2]).name(), "toggle");
    }
}
