//! Query helpers for extracting data from loaded runs.

use cstr_results::TrajectoryRecord;

use crate::error::{AppError, AppResult};

/// Variable names accepted by [`extract_series`].
pub const SERIES_VARIABLES: &[&str] = &[
    "temperature",
    "concentration",
    "command",
    "error",
    "setpoint",
];

/// Summary of a run's time range and data.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub final_temperature: f64,
    pub final_concentration: f64,
    pub command_range: (f64, f64),
}

/// Get run summary from trajectory records.
pub fn get_run_summary(records: &[TrajectoryRecord]) -> AppResult<RunSummary> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InvalidInput("No records in run".to_string())),
    };

    let command_range = records
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.command), hi.max(r.command))
        });

    Ok(RunSummary {
        time_range: (first.time, last.time),
        record_count: records.len(),
        final_temperature: last.temperature,
        final_concentration: last.concentration,
        command_range,
    })
}

/// Extract `(time, value)` pairs for one variable.
pub fn extract_series(records: &[TrajectoryRecord], variable: &str) -> AppResult<Vec<(f64, f64)>> {
    let pick: fn(&TrajectoryRecord) -> f64 = match variable {
        "temperature" | "T" => |r| r.temperature,
        "concentration" | "CA" => |r| r.concentration,
        "command" | "coolant_temperature" | "Tc" => |r| r.command,
        "error" => |r| r.error,
        "setpoint" | "SP" => |r| r.setpoint,
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Unknown variable: {} (expected one of {})",
                variable,
                SERIES_VARIABLES.join(", ")
            )));
        }
    };

    Ok(records.iter().map(|r| (r.time, pick(r))).collect())
}
