//! Error types for spectrascope-core
//!
//! Pure lookups (hit tests, color resolution) never fail; they fall back to
//! neutral results. Errors are reserved for configuration and context
//! construction, where a caller handed us something inconsistent.

use thiserror::Error;

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Container has no drawable area
    #[error("Invalid viewport: {width}x{height} (must be positive and finite)")]
    InvalidViewport { width: f64, height: f64 },

    /// A per-sample array does not have one entry per sample
    #[error("Length mismatch for '{field}': expected {expected} entries, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Palette name not recognized
    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    /// Color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization of configuration failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Validation utilities
pub mod validation {
    use super::*;
    use crate::types::Viewport;

    /// Validate that a viewport has a drawable area
    pub fn validate_viewport(viewport: &Viewport) -> CoreResult<()> {
        if viewport.is_empty() {
            return Err(CoreError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(())
    }

    /// Validate that a per-sample column has exactly `expected` entries
    pub fn validate_column_length(field: &str, expected: usize, actual: usize) -> CoreResult<()> {
        if expected != actual {
            return Err(CoreError::LengthMismatch {
                field: field.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Validate an opacity value
    pub fn validate_opacity(name: &str, value: f32) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&value) {
            return Err(CoreError::InvalidConfig(format!(
                "{name} must be within [0, 1], got {value}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Viewport;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::LengthMismatch {
            field: "y".to_string(),
            expected: 10,
            actual: 9,
        };
        assert!(err.to_string().contains("'y'"));
        assert!(err.to_string().contains("got 9"));
    }

    #[test]
    fn test_validate_viewport() {
        assert!(validation::validate_viewport(&Viewport::new(640.0, 480.0)).is_ok());
        assert!(validation::validate_viewport(&Viewport::new(0.0, 480.0)).is_err());
    }

    #[test]
    fn test_validate_column_length() {
        assert!(validation::validate_column_length("folds", 5, 5).is_ok());
        assert!(validation::validate_column_length("folds", 5, 4).is_err());
    }

    #[test]
    fn test_validate_opacity() {
        assert!(validation::validate_opacity("unselected_opacity", 0.25).is_ok());
        assert!(validation::validate_opacity("unselected_opacity", 1.5).is_err());
    }
}
