//! Sample period configuration for digital controllers.
//!
//! The controller runs once per sample interval; its output is held constant
//! over the interval (zero-order hold) by whoever applies it.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// Sample configuration for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Sample period, in the run's time unit.
    pub dt: f64,
}

impl SampleConfig {
    /// Create a new sample configuration. `dt` must be finite and positive.
    pub fn new(dt: f64) -> ControlResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "sample period must be positive",
            });
        }
        Ok(Self { dt })
    }

    /// Time covered by `samples` whole sample intervals.
    pub fn elapsed(&self, samples: usize) -> f64 {
        samples as f64 * self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_creation() {
        let config = SampleConfig::new(0.1).unwrap();
        assert_eq!(config.dt, 0.1);
    }

    #[test]
    fn rejects_non_positive_period() {
        assert!(SampleConfig::new(0.0).is_err());
        assert!(SampleConfig::new(-1.0).is_err());
        assert!(SampleConfig::new(f64::NAN).is_err());
    }

    #[test]
    fn elapsed_counts_whole_intervals() {
        let config = SampleConfig::new(0.5).unwrap();
        assert_eq!(config.elapsed(0), 0.0);
        assert_eq!(config.elapsed(4), 2.0);
    }
}
