//! Frame scheduling
//!
//! Store and context changes request a repaint; the host's render loop asks
//! for at most one frame per animation tick. Any number of requests between
//! two ticks coalesce into one frame carrying the most demanding reason.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use spectrascope_selection::SelectionChange;
use tracing::{debug, trace};

/// Why a repaint was requested, least to most work
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaintReason {
    /// Container resized or camera moved; cached colors still apply
    Viewport,
    /// Hovered sample changed
    Hover,
    /// Selected or pinned set changed
    Selection,
    /// Color configuration or context changed
    Colors,
    /// Charts added or dataset replaced
    Data,
}

impl RepaintReason {
    /// Whether colors must be re-resolved for this frame
    pub fn needs_colors(&self) -> bool {
        *self >= RepaintReason::Hover
    }

    /// Repaint needed after a store change, if any
    pub fn for_selection_change(change: SelectionChange) -> Option<Self> {
        match change {
            SelectionChange::Hovered => Some(RepaintReason::Hover),
            SelectionChange::Selected | SelectionChange::Pinned | SelectionChange::Reset => {
                Some(RepaintReason::Selection)
            }
            SelectionChange::ToolMode => None,
        }
    }
}

/// A frame handed to the render loop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Sequence number, starting at 1
    pub number: u64,
    pub reason: RepaintReason,
    /// Requests folded into this frame
    pub coalesced: u64,
}

/// Cloneable handle for requesting repaints, e.g. from a store subscription
#[derive(Clone, Debug, Default)]
pub struct FrameRequester {
    pending: Rc<Cell<Option<RepaintReason>>>,
    requests: Rc<Cell<u64>>,
}

impl FrameRequester {
    pub fn request(&self, reason: RepaintReason) {
        let next = match self.pending.get() {
            Some(current) => current.max(reason),
            None => reason,
        };
        self.pending.set(Some(next));
        self.requests.set(self.requests.get() + 1);
        trace!(?reason, "repaint requested");
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    requester: FrameRequester,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle sharing this scheduler's pending state
    pub fn requester(&self) -> FrameRequester {
        self.requester.clone()
    }

    pub fn request(&self, reason: RepaintReason) {
        self.requester.request(reason);
    }

    pub fn is_pending(&self) -> bool {
        self.requester.is_pending()
    }

    pub fn pending_reason(&self) -> Option<RepaintReason> {
        self.requester.pending.get()
    }

    /// Take the pending frame, if any, for this animation tick
    pub fn begin_frame(&mut self) -> Option<Frame> {
        let reason = self.requester.pending.take()?;
        let coalesced = self.requester.requests.replace(0);
        self.frames += 1;
        debug!(frame = self.frames, ?reason, coalesced, "begin frame");
        Some(Frame {
            number: self.frames,
            reason,
            coalesced,
        })
    }

    /// Frames handed out so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_without_requests() {
        let mut scheduler = FrameScheduler::new();
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.begin_frame(), None);
    }

    #[test]
    fn test_requests_coalesce_to_strongest_reason() {
        let mut scheduler = FrameScheduler::new();
        let requester = scheduler.requester();
        requester.request(RepaintReason::Hover);
        requester.request(RepaintReason::Selection);
        scheduler.request(RepaintReason::Viewport);

        let frame = scheduler.begin_frame().unwrap();
        assert_eq!(frame.number, 1);
        assert_eq!(frame.reason, RepaintReason::Selection);
        assert_eq!(frame.coalesced, 3);
        assert_eq!(scheduler.begin_frame(), None);
    }

    #[test]
    fn test_viewport_reuses_colors() {
        assert!(!RepaintReason::Viewport.needs_colors());
        assert!(RepaintReason::Hover.needs_colors());
        assert_eq!(RepaintReason::for_selection_change(SelectionChange::ToolMode), None);
    }
}
