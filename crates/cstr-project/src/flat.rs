//! Intake from a flat `name -> number` map, as produced by form-style front ends.

use crate::schema::RunConfig;
use crate::validate::{ValidationError, validate_config};
use std::collections::BTreeMap;

/// Keys accepted by [`RunConfig::from_flat_map`].
pub const FLAT_KEYS: &[&str] = &[
    "volume",
    "heat_capacity",
    "density",
    "rate_factor",
    "activation_energy",
    "enthalpy",
    "heat_transfer",
    "gas_constant",
    "feed_flow",
    "feed_concentration",
    "feed_temperature",
    "coolant_temperature",
    "kp",
    "ki",
    "kd",
    "setpoint",
    "dt",
    "output_lower",
    "output_upper",
    "settling_threshold",
    "initial_concentration",
    "initial_temperature",
    "n_steps",
    "substeps",
];

fn count(key: &str, value: f64) -> Result<usize, ValidationError> {
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(ValidationError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive whole number".to_string(),
        })
    }
}

impl RunConfig {
    /// Build a config from defaults overridden by `values`, then validate it.
    ///
    /// Unknown keys are rejected rather than ignored.
    pub fn from_flat_map(values: &BTreeMap<String, f64>) -> Result<Self, ValidationError> {
        let mut config = RunConfig::default();
        for (key, &value) in values {
            let slot = match key.as_str() {
                "volume" => &mut config.reactor.volume,
                "heat_capacity" => &mut config.reactor.heat_capacity,
                "density" => &mut config.reactor.density,
                "rate_factor" => &mut config.reactor.rate_factor,
                "activation_energy" => &mut config.reactor.activation_energy,
                "enthalpy" => &mut config.reactor.enthalpy,
                "heat_transfer" => &mut config.reactor.heat_transfer,
                "gas_constant" => &mut config.reactor.gas_constant,
                "feed_flow" => &mut config.feed.flow,
                "feed_concentration" => &mut config.feed.concentration,
                "feed_temperature" => &mut config.feed.temperature,
                "coolant_temperature" => &mut config.feed.coolant_temperature,
                "kp" => &mut config.controller.kp,
                "ki" => &mut config.controller.ki,
                "kd" => &mut config.controller.kd,
                "setpoint" => &mut config.controller.setpoint,
                "dt" => &mut config.controller.dt,
                "output_lower" => &mut config.controller.output_lower,
                "output_upper" => &mut config.controller.output_upper,
                "settling_threshold" => &mut config.controller.settling_threshold,
                "initial_concentration" => &mut config.initial.concentration,
                "initial_temperature" => &mut config.initial.temperature,
                "n_steps" => {
                    config.simulation.n_steps = count(key, value)?;
                    continue;
                }
                "substeps" => {
                    config.simulation.substeps = count(key, value)?;
                    continue;
                }
                _ => return Err(ValidationError::UnknownKey { key: key.clone() }),
            };
            *slot = value;
        }
        validate_config(&config)?;
        Ok(config)
    }

    /// Inverse of [`from_flat_map`](Self::from_flat_map) for the scalar fields.
    pub fn to_flat_map(&self) -> BTreeMap<String, f64> {
        let r = &self.reactor;
        let f = &self.feed;
        let c = &self.controller;
        let pairs = [
            ("volume", r.volume),
            ("heat_capacity", r.heat_capacity),
            ("density", r.density),
            ("rate_factor", r.rate_factor),
            ("activation_energy", r.activation_energy),
            ("enthalpy", r.enthalpy),
            ("heat_transfer", r.heat_transfer),
            ("gas_constant", r.gas_constant),
            ("feed_flow", f.flow),
            ("feed_concentration", f.concentration),
            ("feed_temperature", f.temperature),
            ("coolant_temperature", f.coolant_temperature),
            ("kp", c.kp),
            ("ki", c.ki),
            ("kd", c.kd),
            ("setpoint", c.setpoint),
            ("dt", c.dt),
            ("output_lower", c.output_lower),
            ("output_upper", c.output_upper),
            ("settling_threshold", c.settling_threshold),
            ("initial_concentration", self.initial.concentration),
            ("initial_temperature", self.initial.temperature),
            ("n_steps", self.simulation.n_steps as f64),
            ("substeps", self.simulation.substeps as f64),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}
