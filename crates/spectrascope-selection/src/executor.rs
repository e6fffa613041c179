//! Action executor
//!
//! The only path from gesture handling to the store's mutators.

use spectrascope_core::SampleIndex;
use tracing::{debug, warn};

use crate::action::{
    compute_area_selection_action, compute_selection_action, AreaHit, PointHit, SelectionAction,
};
use crate::input::SelectionModifiers;
use crate::state::ToolMode;
use crate::store::{SelectMode, SelectionStore};

/// Applies resolved actions to a borrowed store
#[derive(Debug)]
pub struct ActionExecutor<'a> {
    store: &'a mut SelectionStore,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(store: &'a mut SelectionStore) -> Self {
        Self { store }
    }

    /// Apply an action; returns whether the selection changed
    ///
    /// Actions with no in-range indices (an empty lasso, or a hit list that
    /// went stale with a dataset reload) are no-ops, never a clear.
    pub fn apply(&mut self, action: &SelectionAction) -> bool {
        if !matches!(action, SelectionAction::Clear) {
            let n = self.store.sample_count();
            if !action.indices().iter().any(|&i| i < n) {
                if action.indices().is_empty() {
                    debug!(action = action.name(), "empty area action ignored");
                } else {
                    warn!(
                        action = action.name(),
                        dropped = action.indices().len(),
                        sample_count = n,
                        "action has only out-of-range indices, ignored"
                    );
                }
                return false;
            }
        }

        let indices = action.indices().iter().copied();
        match action {
            SelectionAction::Replace(_) => self.store.select(indices, SelectMode::Replace),
            SelectionAction::Add(_) => self.store.select(indices, SelectMode::Add),
            SelectionAction::Toggle(_) => self.store.toggle(indices),
            SelectionAction::Clear => self.store.clear(),
        }
    }

    /// Resolve and apply a click on a sample
    pub fn handle_click(
        &mut self,
        hit: PointHit,
        modifiers: SelectionModifiers,
    ) -> SelectionAction {
        let action = compute_selection_action(hit, self.store.selected(), modifiers);
        self.apply(&action);
        action
    }

    /// Resolve and apply a completed lasso/box
    pub fn handle_area(&mut self, hit: &AreaHit, modifiers: SelectionModifiers) -> SelectionAction {
        let action = compute_area_selection_action(hit, self.store.selected(), modifiers);
        self.apply(&action);
        action
    }

    /// Click on empty background: clears only under the click tool
    pub fn handle_background_click(&mut self) -> Option<SelectionAction> {
        if self.store.tool_mode() != ToolMode::Click {
            return None;
        }
        let action = SelectionAction::Clear;
        self.apply(&action);
        Some(action)
    }

    /// Track the sample under the pointer
    pub fn handle_hover(&mut self, index: Option<SampleIndex>) -> bool {
        self.store.set_hovered(index)
    }
}
