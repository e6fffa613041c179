//! Error types for spectrascope-selection
//!
//! Selection mutations never fail: stale indices are dropped and empty area
//! gestures are no-ops. Errors cover handle misuse and invalid geometry setup.

use spectrascope_core::CoreError;
use thiserror::Error;

use crate::store::SubscriptionId;

#[derive(Error, Debug)]
pub enum SelectionError {
    /// Unsubscribe with an id that is not registered
    #[error("Subscription not found: {id:?}")]
    SubscriptionNotFound { id: SubscriptionId },

    /// Invalid viewport or other core validation failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SelectionResult<T> = Result<T, SelectionError>;
