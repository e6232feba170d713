//! Control loop performance metrics over an error history.
//!
//! Integrals are plain sums over samples (unit sample spacing), matching the
//! way the history is recorded: one sample per controller update.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default settling band as a fraction of the setpoint (2 %).
pub const DEFAULT_SETTLING_THRESHOLD: f64 = 0.02;

/// Standard error-based performance statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlMetrics {
    /// Integral of squared error
    pub ise: f64,
    /// Integral of absolute error
    pub iae: f64,
    /// Integral of sample-index-weighted absolute error
    pub itae: f64,
    /// Largest absolute error seen
    pub max_error: f64,
    /// Samples before the error entered the settling band for good
    pub settling_time: usize,
}

impl ControlMetrics {
    /// Compute metrics for `errors`. Returns `None` for an empty history.
    pub fn compute(errors: &[f64], setpoint: f64, threshold: f64) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }

        let mut ise = 0.0;
        let mut iae = 0.0;
        let mut itae = 0.0;
        let mut max_error = 0.0_f64;
        for (i, e) in errors.iter().enumerate() {
            let abs = e.abs();
            ise += e * e;
            iae += abs;
            itae += i as f64 * abs;
            max_error = max_error.max(abs);
        }

        Some(Self {
            ise,
            iae,
            itae,
            max_error,
            settling_time: settling_time(errors, threshold * setpoint.abs()),
        })
    }

    /// Flat name -> value view for reporting collaborators.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("ise".to_string(), self.ise),
            ("iae".to_string(), self.iae),
            ("itae".to_string(), self.itae),
            ("max_error".to_string(), self.max_error),
            ("settling_time".to_string(), self.settling_time as f64),
        ])
    }
}

/// Number of leading samples up to and including the last one outside `band`.
///
/// Scans backward from the most recent sample and stops at the first sample
/// with `|error| > band`. Returns 0 when no sample violates the band.
pub fn settling_time(errors: &[f64], band: f64) -> usize {
    errors
        .iter()
        .rposition(|e| e.abs() > band)
        .map_or(0, |i| i + 1)
}
