//! Error types for simulation operations.

use cstr_controls::ControlError;
use cstr_reactor::ReactorError;
use thiserror::Error;

/// Errors encountered during closed-loop simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not allowed in the loop's current status.
    #[error("Invalid use of simulation loop: {what}")]
    Usage { what: &'static str },

    /// The reactor derivative overflowed inside an integration step.
    #[error("Non-finite derivative at t = {time}")]
    NonFiniteDerivative { time: f64 },

    /// A step produced a non-finite or non-physical result.
    #[error("Simulation diverged at step {step}: {what}")]
    Diverged { step: usize, what: String },

    #[error("Controller error: {0}")]
    Control(#[from] ControlError),

    #[error("Reactor error: {0}")]
    Reactor(#[from] ReactorError),
}

pub type SimResult<T> = Result<T, SimError>;
