//! Shared application service layer for cstrflow.
//!
//! Builds runtime objects from a `RunConfig`, executes and caches
//! closed-loop runs, solves steady states and extracts series from stored
//! runs. The CLI is a thin layer over this crate.

pub mod compile;
pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod steady_service;

pub use compile::{build_controller, build_feed, build_initial_state, build_reactor, build_simulation};
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use query::{RunSummary, SERIES_VARIABLES, extract_series, get_run_summary};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, SimulationOutcome, ensure_run, ensure_run_in_store,
    ensure_run_with_progress, list_runs, load_run, run_simulation,
};
pub use steady_service::{OpenLoopPoint, SteadySummary, open_loop_response, solve_steady};
