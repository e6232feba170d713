//! Content-based hashing for run IDs.

use cstr_project::RunConfig;
use sha2::{Digest, Sha256};

/// Run id from the full configuration and the solver version.
///
/// The same config always maps to the same id, so a stored run can be reused.
pub fn compute_run_id(config: &RunConfig, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
