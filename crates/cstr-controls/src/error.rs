//! Error types for control operations.

use cstr_core::CoreError;
use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Non-finite measurement or setpoint reached the controller.
    #[error("Non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl From<CoreError> for ControlError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, value } => ControlError::NonFinite { what, value },
            CoreError::InvalidArg { what } => ControlError::InvalidArg { what },
        }
    }
}
