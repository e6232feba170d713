//! Error types for the cstr-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Reactor error: {0}")]
    Reactor(String),

    #[error("Controller error: {0}")]
    Control(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cstr-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<cstr_project::ProjectError> for AppError {
    fn from(err: cstr_project::ProjectError) -> Self {
        match err {
            cstr_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Config(other.to_string()),
        }
    }
}

impl From<cstr_project::ValidationError> for AppError {
    fn from(err: cstr_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<cstr_reactor::ReactorError> for AppError {
    fn from(err: cstr_reactor::ReactorError) -> Self {
        AppError::Reactor(err.to_string())
    }
}

impl From<cstr_controls::ControlError> for AppError {
    fn from(err: cstr_controls::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}

impl From<cstr_sim::SimError> for AppError {
    fn from(err: cstr_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<cstr_results::ResultsError> for AppError {
    fn from(err: cstr_results::ResultsError) -> Self {
        match err {
            cstr_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
