//! spectrascope-selection - Cross-chart selection
//!
//! One [`SelectionStore`] per chart session holds the selected, pinned and
//! hovered samples and the active tool. Charts never mutate it directly:
//!
//! 1. [`GestureTracker`] turns pointer events into a completed [`Gesture`]
//! 2. the chart hit-tests the gesture ([`HitTester`])
//! 3. the resolver ([`compute_selection_action`] /
//!    [`compute_area_selection_action`]) picks a [`SelectionAction`]
//! 4. [`ActionExecutor`] applies it to the store
//! 5. subscribers are notified once the change has settled
//!
//! [`SelectionController`] bundles steps 1 to 4 for one chart.

pub mod action;
pub mod controller;
pub mod error;
pub mod executor;
pub mod gesture;
pub mod input;
pub mod state;
pub mod store;

pub use action::{
    compute_area_selection_action, compute_selection_action, AreaHit, PointHit, SelectionAction,
};
pub use controller::{HitTester, PointerOutcome, SelectionController};
pub use error::{SelectionError, SelectionResult};
pub use executor::ActionExecutor;
pub use gesture::{Gesture, GestureConfig, GestureTracker};
pub use input::{Modifiers, MouseButton, PointerEvent, SelectionModifiers};
pub use state::{SelectionChange, SelectionState, ToolMode};
pub use store::{SelectMode, SelectionCallback, SelectionStore, SubscriptionId};
