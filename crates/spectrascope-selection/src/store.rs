//! Selection store
//!
//! The single source of truth for selected, pinned and hovered samples and
//! the active tool. The mutation API is deliberately narrow. Every effective
//! mutation installs fresh sets, bumps the revision and then notifies
//! subscribers, so a subscriber always observes a fully applied change.
//! Indices at or above the current sample count are dropped on the way in.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spectrascope_core::SampleIndex;
use tracing::{debug, warn};

use crate::error::{SelectionError, SelectionResult};
use crate::state::{SelectionChange, SelectionState, ToolMode};

/// How `select` combines with the current selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectMode {
    Replace,
    Add,
}

/// Handle returned by [`SelectionStore::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

/// Observer callback
pub type SelectionCallback = Box<dyn FnMut(&SelectionState, SelectionChange)>;

pub struct SelectionStore {
    state: SelectionState,
    sample_count: usize,
    subscribers: Vec<(SubscriptionId, SelectionCallback)>,
    next_subscription: u64,
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("state", &self.state)
            .field("sample_count", &self.sample_count)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SelectionStore {
    /// Create an empty store for a dataset of `sample_count` samples
    pub fn new(sample_count: usize) -> Self {
        Self {
            state: SelectionState::default(),
            sample_count,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn selected(&self) -> &Arc<BTreeSet<SampleIndex>> {
        &self.state.selected
    }

    pub fn pinned(&self) -> &Arc<BTreeSet<SampleIndex>> {
        &self.state.pinned
    }

    pub fn hovered(&self) -> Option<SampleIndex> {
        self.state.hovered
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.state.tool_mode
    }

    pub fn revision(&self) -> u64 {
        self.state.revision
    }

    // MARK: - Subscriptions

    /// Register an observer, called after every effective change
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&SelectionState, SelectionChange) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> SelectionResult<()> {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        if self.subscribers.len() == before {
            return Err(SelectionError::SubscriptionNotFound { id });
        }
        Ok(())
    }

    // MARK: - Mutations

    /// Replace the selection with, or add, the given indices
    pub fn select(
        &mut self,
        indices: impl IntoIterator<Item = SampleIndex>,
        mode: SelectMode,
    ) -> bool {
        let incoming = self.sanitize(indices, "select");
        let next = match mode {
            SelectMode::Replace => incoming,
            SelectMode::Add => self.state.selected.union(&incoming).copied().collect(),
        };
        debug!(?mode, count = next.len(), "select");
        self.install_selected(next)
    }

    /// Flip membership of each given index
    pub fn toggle(&mut self, indices: impl IntoIterator<Item = SampleIndex>) -> bool {
        let incoming = self.sanitize(indices, "toggle");
        let next: BTreeSet<SampleIndex> = self
            .state
            .selected
            .symmetric_difference(&incoming)
            .copied()
            .collect();
        debug!(toggled = incoming.len(), count = next.len(), "toggle");
        self.install_selected(next)
    }

    pub fn clear(&mut self) -> bool {
        debug!("clear selection");
        self.install_selected(BTreeSet::new())
    }

    pub fn select_all(&mut self) -> bool {
        self.install_selected((0..self.sample_count).collect())
    }

    /// Select exactly the samples that are not selected
    pub fn invert(&mut self) -> bool {
        let next = (0..self.sample_count)
            .filter(|i| !self.state.selected.contains(i))
            .collect();
        self.install_selected(next)
    }

    /// Set or clear the hovered sample; out-of-range indices clear it
    pub fn set_hovered(&mut self, index: Option<SampleIndex>) -> bool {
        let index = index.filter(|&i| i < self.sample_count);
        if self.state.hovered == index {
            return false;
        }
        self.state.hovered = index;
        self.commit(SelectionChange::Hovered);
        true
    }

    pub fn pin(&mut self, indices: impl IntoIterator<Item = SampleIndex>) -> bool {
        let incoming = self.sanitize(indices, "pin");
        let next = self.state.pinned.union(&incoming).copied().collect();
        self.install_pinned(next)
    }

    pub fn unpin(&mut self, indices: impl IntoIterator<Item = SampleIndex>) -> bool {
        let outgoing: BTreeSet<SampleIndex> = indices.into_iter().collect();
        let next = self.state.pinned.difference(&outgoing).copied().collect();
        self.install_pinned(next)
    }

    pub fn unpin_all(&mut self) -> bool {
        self.install_pinned(BTreeSet::new())
    }

    pub fn set_tool_mode(&mut self, mode: ToolMode) -> bool {
        if self.state.tool_mode == mode {
            return false;
        }
        self.state.tool_mode = mode;
        self.commit(SelectionChange::ToolMode);
        true
    }

    /// Switch to a new dataset; selection, pins and hover are cleared
    pub fn set_sample_count(&mut self, sample_count: usize) {
        self.sample_count = sample_count;
        self.state.selected = Arc::default();
        self.state.pinned = Arc::default();
        self.state.hovered = None;
        debug!(sample_count, "dataset changed, selection reset");
        self.commit(SelectionChange::Reset);
    }

    // MARK: - Internals

    fn sanitize(
        &self,
        indices: impl IntoIterator<Item = SampleIndex>,
        op: &'static str,
    ) -> BTreeSet<SampleIndex> {
        let mut dropped = 0usize;
        let kept = indices
            .into_iter()
            .filter(|&i| {
                let ok = i < self.sample_count;
                if !ok {
                    dropped += 1;
                }
                ok
            })
            .collect();
        if dropped > 0 {
            warn!(op, dropped, sample_count = self.sample_count, "dropping out-of-range indices");
        }
        kept
    }

    fn install_selected(&mut self, next: BTreeSet<SampleIndex>) -> bool {
        if *self.state.selected == next {
            return false;
        }
        self.state.selected = Arc::new(next);
        self.commit(SelectionChange::Selected);
        true
    }

    fn install_pinned(&mut self, next: BTreeSet<SampleIndex>) -> bool {
        if *self.state.pinned == next {
            return false;
        }
        self.state.pinned = Arc::new(next);
        self.commit(SelectionChange::Pinned);
        true
    }

    fn commit(&mut self, change: SelectionChange) {
        self.state.revision += 1;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.state, change);
        }
    }
}
