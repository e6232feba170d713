//! Result data types.

use cstr_project::RunConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub name: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub solver_version: String,
    pub status: RunStatus,
    pub steps_completed: usize,
    /// Controller metrics at the end of the run (`ise`, `iae`, ...)
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    pub config: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunStatus {
    Complete,
    /// Diverged at `step`; the stored series holds the steps before it.
    Failed { step: usize, reason: String },
}

impl RunStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, RunStatus::Complete)
    }
}

/// One committed simulation step, flattened for JSONL storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryRecord {
    pub step: usize,
    pub time: f64,
    pub concentration: f64,
    pub temperature: f64,
    pub command: f64,
    pub error: f64,
    pub setpoint: f64,
}

/// Current UTC time in the manifest timestamp format.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
