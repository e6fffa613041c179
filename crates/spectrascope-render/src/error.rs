//! Error types for spectrascope-render

use spectrascope_core::CoreError;
use spectrascope_selection::SelectionError;
use thiserror::Error;

/// Main error type for adapters and chart sessions
#[derive(Error, Debug)]
pub enum RenderError {
    /// No chart registered under this id
    #[error("Unknown chart: {id}")]
    UnknownChart { id: String },

    /// A chart with this id is already registered
    #[error("Chart already registered: {id}")]
    DuplicateChart { id: String },

    /// Colors or a chart do not cover the dataset's samples one to one
    #[error("Sample count mismatch: expected {expected}, got {actual}")]
    FrameMismatch { expected: usize, actual: usize },

    /// Renderer configuration rejected
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Validation helpers
pub mod validation {
    use super::*;

    /// A frame must carry exactly one color per sample
    pub fn validate_frame(expected: usize, actual: usize) -> RenderResult<()> {
        if expected != actual {
            return Err(RenderError::FrameMismatch { expected, actual });
        }
        Ok(())
    }

    pub fn validate_radius(name: &str, value: f64) -> RenderResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "{name} must be finite and non-negative, got {value}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_mismatch_message() {
        let err = validation::validate_frame(10, 9).unwrap_err();
        assert_eq!(err.to_string(), "Sample count mismatch: expected 10, got 9");
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: RenderError = CoreError::InvalidViewport {
            width: 0.0,
            height: 10.0,
        }
        .into();
        assert!(err.to_string().starts_with("Invalid viewport"));
    }
}
