//! PID controller with anti-windup and derivative on measurement.
//!
//! Per update, with `e = sp - pv`:
//! - integral accumulates `e * dt`
//! - derivative is `-(pv - pv_prev) / dt`, zero on the first update
//! - output `kp*e + ki*integral + kd*derivative`, clamped to `[out_min, out_max]`
//! - if the clamped output sits on a bound, the integral step is undone

use crate::error::{ControlError, ControlResult};
use crate::metrics::{ControlMetrics, DEFAULT_SETTLING_THRESHOLD};
use crate::sampled::SampleConfig;
use cstr_core::ensure_finite;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Initial setpoint. Updates may override it.
    pub setpoint: f64,
    /// Sample interval.
    pub sample: SampleConfig,
    /// Minimum output value.
    pub out_min: f64,
    /// Maximum output value.
    pub out_max: f64,
    /// Settling band as a fraction of the setpoint.
    pub settling_threshold: f64,
}

impl PidConfig {
    /// Create a new PID configuration.
    ///
    /// # Arguments
    ///
    /// * `kp`, `ki`, `kd` - Gains
    /// * `setpoint` - Initial setpoint
    /// * `dt` - Sample interval (must be positive)
    /// * `out_min`, `out_max` - Output bounds (`out_min < out_max`)
    pub fn new(
        kp: f64,
        ki: f64,
        kd: f64,
        setpoint: f64,
        dt: f64,
        out_min: f64,
        out_max: f64,
    ) -> ControlResult<Self> {
        let config = Self {
            kp,
            ki,
            kd,
            setpoint,
            sample: SampleConfig::new(dt)?,
            out_min,
            out_max,
            settling_threshold: DEFAULT_SETTLING_THRESHOLD,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the settling band fraction used by metrics.
    pub fn with_settling_threshold(mut self, threshold: f64) -> ControlResult<Self> {
        self.settling_threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.kp, "kp")?;
        ensure_finite(self.ki, "ki")?;
        ensure_finite(self.kd, "kd")?;
        ensure_finite(self.setpoint, "setpoint")?;
        SampleConfig::new(self.sample.dt)?;
        ensure_finite(self.out_min, "out_min")?;
        ensure_finite(self.out_max, "out_max")?;
        if self.out_min >= self.out_max {
            return Err(ControlError::InvalidArg {
                what: "out_min must be less than out_max",
            });
        }
        if !(self.settling_threshold.is_finite() && self.settling_threshold > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "settling_threshold must be positive",
            });
        }
        Ok(())
    }

    /// Clamp a value into the output bounds.
    pub fn clamp_output(&self, value: f64) -> f64 {
        value.clamp(self.out_min, self.out_max)
    }
}

/// Individual PID contributions from the most recent update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidTerms {
    pub proportional: f64,
    pub integral: f64,
    pub derivative: f64,
}

/// Stateful PID controller.
#[derive(Debug, Clone)]
pub struct PidController {
    config: PidConfig,
    setpoint: f64,
    integral: f64,
    previous_error: f64,
    previous_measurement: Option<f64>,
    last_terms: Option<PidTerms>,
    error_history: Vec<f64>,
    output_history: Vec<f64>,
}

impl PidController {
    pub fn new(config: PidConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            setpoint: config.setpoint,
            config,
            integral: 0.0,
            previous_error: 0.0,
            previous_measurement: None,
            last_terms: None,
            error_history: Vec::new(),
            output_history: Vec::new(),
        })
    }

    /// Compute the next command from a measurement.
    ///
    /// A `setpoint` replaces the current one for this and later updates.
    /// Non-finite inputs are rejected and leave the controller untouched.
    pub fn update(&mut self, measurement: f64, setpoint: Option<f64>) -> ControlResult<f64> {
        let measurement = ensure_finite(measurement, "measurement")?;
        let setpoint = match setpoint {
            Some(sp) => ensure_finite(sp, "setpoint")?,
            None => self.setpoint,
        };

        let dt = self.config.sample.dt;
        let error = setpoint - measurement;
        let mut integral = self.integral + error * dt;

        let derivative = match self.previous_measurement {
            Some(previous) => -(measurement - previous) / dt,
            None => 0.0,
        };

        let terms = PidTerms {
            proportional: self.config.kp * error,
            integral: self.config.ki * integral,
            derivative: self.config.kd * derivative,
        };
        let raw = terms.proportional + terms.integral + terms.derivative;
        if raw.is_nan() {
            return Err(ControlError::NonFinite {
                what: "controller output",
                value: raw,
            });
        }

        let output = self.config.clamp_output(raw);
        if output == self.config.out_min || output == self.config.out_max {
            integral = self.integral;
        }

        self.setpoint = setpoint;
        self.integral = integral;
        self.previous_error = error;
        self.previous_measurement = Some(measurement);
        self.last_terms = Some(terms);
        self.error_history.push(error);
        self.output_history.push(output);

        Ok(output)
    }

    /// Clear integral, previous error/measurement and histories.
    ///
    /// The current setpoint is kept.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
        self.previous_measurement = None;
        self.last_terms = None;
        self.error_history.clear();
        self.output_history.clear();
    }

    /// Named metrics over the error history; empty before the first update.
    pub fn metrics(&self) -> BTreeMap<String, f64> {
        self.control_metrics()
            .map(|m| m.to_map())
            .unwrap_or_default()
    }

    pub fn control_metrics(&self) -> Option<ControlMetrics> {
        ControlMetrics::compute(
            &self.error_history,
            self.setpoint,
            self.config.settling_threshold,
        )
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn set_setpoint(&mut self, setpoint: f64) -> ControlResult<()> {
        self.setpoint = ensure_finite(setpoint, "setpoint")?;
        Ok(())
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }

    pub fn previous_measurement(&self) -> Option<f64> {
        self.previous_measurement
    }

    pub fn last_terms(&self) -> Option<PidTerms> {
        self.last_terms
    }

    pub fn error_history(&self) -> &[f64] {
        &self.error_history
    }

    pub fn output_history(&self) -> &[f64] {
        &self.output_history
    }
}
