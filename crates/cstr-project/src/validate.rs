//! Run configuration validation.

use crate::schema::{ControllerDef, FeedDef, InitialDef, ReactorDef, RunConfig, SimulationDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown key: {key}")]
    UnknownKey { key: String },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite"))
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be non-negative"))
    }
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.name.trim().is_empty() {
        return Err(invalid("name", &config.name, "must not be empty"));
    }
    validate_reactor(&config.reactor)?;
    validate_feed(&config.feed)?;
    validate_controller(&config.controller)?;
    validate_initial(&config.initial)?;
    validate_simulation(&config.simulation)?;
    Ok(())
}

fn validate_reactor(r: &ReactorDef) -> Result<(), ValidationError> {
    positive("reactor.volume", r.volume)?;
    positive("reactor.heat_capacity", r.heat_capacity)?;
    positive("reactor.density", r.density)?;
    positive("reactor.rate_factor", r.rate_factor)?;
    non_negative("reactor.activation_energy", r.activation_energy)?;
    finite("reactor.enthalpy", r.enthalpy)?;
    positive("reactor.heat_transfer", r.heat_transfer)?;
    positive("reactor.gas_constant", r.gas_constant)?;
    Ok(())
}

fn validate_feed(f: &FeedDef) -> Result<(), ValidationError> {
    non_negative("feed.flow", f.flow)?;
    non_negative("feed.concentration", f.concentration)?;
    positive("feed.temperature", f.temperature)?;
    positive("feed.coolant_temperature", f.coolant_temperature)?;
    Ok(())
}

fn validate_controller(c: &ControllerDef) -> Result<(), ValidationError> {
    finite("controller.kp", c.kp)?;
    finite("controller.ki", c.ki)?;
    finite("controller.kd", c.kd)?;
    finite("controller.setpoint", c.setpoint)?;
    positive("controller.dt", c.dt)?;
    finite("controller.output_lower", c.output_lower)?;
    finite("controller.output_upper", c.output_upper)?;
    if c.output_lower >= c.output_upper {
        return Err(invalid(
            "controller.output_lower",
            c.output_lower,
            "must be below controller.output_upper",
        ));
    }
    // The command is a coolant temperature.
    if c.output_lower <= 0.0 {
        return Err(invalid(
            "controller.output_lower",
            c.output_lower,
            "coolant temperature bound must be positive",
        ));
    }
    positive("controller.settling_threshold", c.settling_threshold)?;
    Ok(())
}

fn validate_initial(i: &InitialDef) -> Result<(), ValidationError> {
    non_negative("initial.concentration", i.concentration)?;
    positive("initial.temperature", i.temperature)?;
    Ok(())
}

fn validate_simulation(s: &SimulationDef) -> Result<(), ValidationError> {
    if s.n_steps == 0 {
        return Err(invalid("simulation.n_steps", s.n_steps, "must be positive"));
    }
    if s.substeps == 0 {
        return Err(invalid("simulation.substeps", s.substeps, "must be positive"));
    }
    for change in &s.setpoint_changes {
        finite("simulation.setpoint_changes.setpoint", change.setpoint)?;
        if change.step >= s.n_steps {
            return Err(invalid(
                "simulation.setpoint_changes.step",
                change.step,
                "must be below simulation.n_steps",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SetpointChangeDef;

    #[test]
    fn defaults_are_valid() {
        validate_config(&RunConfig::default()).unwrap();
    }

    #[test]
    fn inverted_output_bounds_rejected() {
        let mut config = RunConfig::default();
        config.controller.output_lower = 400.0;
        config.controller.output_upper = 280.0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "controller.output_lower"));
    }

    #[test]
    fn zero_dt_rejected() {
        let mut config = RunConfig::default();
        config.controller.dt = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn nan_gain_rejected() {
        let mut config = RunConfig::default();
        config.controller.kd = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn negative_volume_rejected() {
        let mut config = RunConfig::default();
        config.reactor.volume = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn negative_enthalpy_allowed() {
        let mut config = RunConfig::default();
        config.reactor.enthalpy = -50_000.0;
        validate_config(&config).unwrap();
    }

    #[test]
    fn setpoint_change_past_end_rejected() {
        let mut config = RunConfig::default();
        config.simulation.setpoint_changes.push(SetpointChangeDef {
            step: 50,
            setpoint: 340.0,
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_steps_rejected() {
        let mut config = RunConfig::default();
        config.simulation.n_steps = 0;
        assert!(validate_config(&config).is_err());
    }
}
