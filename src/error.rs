//! Error types for rangekit

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeKitError {
    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("{parameter} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        parameter: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

impl RangeKitError {
    /// Checks `value` against the closed range `[min, max]`.
    pub(crate) fn check_range(
        parameter: &'static str,
        value: f32,
        min: f32,
        max: f32,
    ) -> Result<()> {
        if value.is_nan() || value < min || value > max {
            return Err(Self::OutOfRange {
                parameter,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, RangeKitError>;
