//! Gesture-to-store wiring for one chart
//!
//! A chart feeds raw pointer events in; the controller tracks the gesture,
//! asks the chart's [`HitTester`] what lies under it and routes the result
//! through the resolver and executor.

use spectrascope_core::{Point2, Region, SampleIndex, Viewport};

use crate::action::{AreaHit, PointHit, SelectionAction};
use crate::error::SelectionResult;
use crate::executor::ActionExecutor;
use crate::gesture::{Gesture, GestureConfig, GestureTracker};
use crate::input::PointerEvent;
use crate::store::SelectionStore;

/// Hit-testing a chart performs in its own space
pub trait HitTester {
    /// Topmost visible sample under a screen point
    fn pick(&self, screen: Point2) -> Option<SampleIndex>;

    /// Visible samples inside a screen-space region
    fn indices_in_screen_region(&self, region: &Region) -> Vec<SampleIndex>;
}

/// What a pointer event did to the selection
#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    /// Hover target changed
    Hover(Option<SampleIndex>),
    /// A gesture completed and resolved to an action
    Action(SelectionAction),
    /// A gesture completed but nothing was applied
    Ignored,
}

#[derive(Clone, Debug)]
pub struct SelectionController {
    tracker: GestureTracker,
}

impl SelectionController {
    pub fn new(viewport: Viewport) -> SelectionResult<Self> {
        Self::with_config(viewport, GestureConfig::default())
    }

    pub fn with_config(viewport: Viewport, config: GestureConfig) -> SelectionResult<Self> {
        Ok(Self {
            tracker: GestureTracker::new(viewport, config)?,
        })
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> SelectionResult<()> {
        self.tracker.set_viewport(viewport)
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    /// Feed a pointer event from the chart
    pub fn handle_pointer<H: HitTester + ?Sized>(
        &mut self,
        event: &PointerEvent,
        store: &mut SelectionStore,
        hits: &H,
    ) -> Option<PointerOutcome> {
        match event {
            PointerEvent::Move { position, .. } if !self.tracker.is_dragging() => {
                self.tracker.handle(event, store.tool_mode());
                let hovered = hits.pick(*position);
                ActionExecutor::new(store)
                    .handle_hover(hovered)
                    .then_some(PointerOutcome::Hover(hovered))
            }
            PointerEvent::Leave => ActionExecutor::new(store)
                .handle_hover(None)
                .then_some(PointerOutcome::Hover(None)),
            _ => {
                let gesture = self.tracker.handle(event, store.tool_mode())?;
                Some(self.apply_gesture(&gesture, store, hits))
            }
        }
    }

    /// Resolve a completed gesture against the chart's hit tester
    pub fn apply_gesture<H: HitTester + ?Sized>(
        &self,
        gesture: &Gesture,
        store: &mut SelectionStore,
        hits: &H,
    ) -> PointerOutcome {
        let mut executor = ActionExecutor::new(store);
        let modifiers = gesture.modifiers();
        let action = match gesture {
            Gesture::Click { position, .. } => match hits.pick(*position) {
                Some(index) => Some(executor.handle_click(PointHit { index }, modifiers)),
                None => executor.handle_background_click(),
            },
            Gesture::Box { .. } | Gesture::Lasso { .. } => gesture.region().map(|region| {
                let hit = AreaHit::new(hits.indices_in_screen_region(&region));
                executor.handle_area(&hit, modifiers)
            }),
        };
        action.map_or(PointerOutcome::Ignored, PointerOutcome::Action)
    }
}
