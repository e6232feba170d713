//! Error types for the reactor model.

use cstr_core::CoreError;
use thiserror::Error;

/// Errors raised by reactor construction and steady-state solving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReactorError {
    /// Parameter, input or guess outside its admissible range.
    #[error("Invalid reactor argument: {0}")]
    InvalidArg(#[from] CoreError),

    /// The steady-state solver gave up.
    #[error("Steady state not converged: {reason}")]
    NotConverged { reason: String },

    /// The solver converged, but to a state that cannot exist physically.
    #[error("Unphysical steady state: concentration = {concentration}, temperature = {temperature}")]
    UnphysicalRoot { concentration: f64, temperature: f64 },
}

pub type ReactorResult<T> = Result<T, ReactorError>;

impl From<cstr_solver::SolverError> for ReactorError {
    fn from(e: cstr_solver::SolverError) -> Self {
        ReactorError::NotConverged {
            reason: e.to_string(),
        }
    }
}
