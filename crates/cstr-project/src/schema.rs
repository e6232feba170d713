//! Run configuration schema.
//!
//! Every field has a default, so a partial file (or an empty one) describes a
//! complete run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub reactor: ReactorDef,
    #[serde(default)]
    pub feed: FeedDef,
    #[serde(default)]
    pub controller: ControllerDef,
    #[serde(default)]
    pub initial: InitialDef,
    #[serde(default)]
    pub simulation: SimulationDef,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            reactor: ReactorDef::default(),
            feed: FeedDef::default(),
            controller: ControllerDef::default(),
            initial: InitialDef::default(),
            simulation: SimulationDef::default(),
        }
    }
}

fn default_name() -> String {
    "cstr".to_string()
}

/// Physical parameters of the reactor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReactorDef {
    pub volume: f64,
    pub heat_capacity: f64,
    pub density: f64,
    pub rate_factor: f64,
    pub activation_energy: f64,
    /// Positive for an endothermic reaction
    pub enthalpy: f64,
    pub heat_transfer: f64,
    pub gas_constant: f64,
}

impl Default for ReactorDef {
    fn default() -> Self {
        Self {
            volume: 1.0,
            heat_capacity: 4.18,
            density: 1000.0,
            rate_factor: 100.0,
            activation_energy: 50_000.0,
            enthalpy: 60_000.0,
            heat_transfer: 500.0,
            gas_constant: 8.314,
        }
    }
}

/// Feed held constant over the run. `coolant_temperature` is only the
/// starting jacket temperature; the controller drives it afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedDef {
    pub flow: f64,
    pub concentration: f64,
    pub temperature: f64,
    pub coolant_temperature: f64,
}

impl Default for FeedDef {
    fn default() -> Self {
        Self {
            flow: 10.0,
            concentration: 1.0,
            temperature: 350.0,
            coolant_temperature: 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerDef {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub setpoint: f64,
    pub dt: f64,
    pub output_lower: f64,
    pub output_upper: f64,
    pub settling_threshold: f64,
}

impl Default for ControllerDef {
    fn default() -> Self {
        Self {
            kp: 5.0,
            ki: 0.2,
            kd: 1.0,
            setpoint: 350.0,
            dt: 1.0,
            output_lower: 280.0,
            output_upper: 400.0,
            settling_threshold: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InitialDef {
    pub concentration: f64,
    pub temperature: f64,
}

impl Default for InitialDef {
    fn default() -> Self {
        Self {
            concentration: 1.0,
            temperature: 320.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationDef {
    pub n_steps: usize,
    pub substeps: usize,
    pub integrator: IntegratorDef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub setpoint_changes: Vec<SetpointChangeDef>,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            n_steps: 50,
            substeps: 20,
            integrator: IntegratorDef::default(),
            setpoint_changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    #[default]
    Rk4,
    ForwardEuler,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SetpointChangeDef {
    pub step: usize,
    pub setpoint: f64,
}
