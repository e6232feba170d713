//! Compilation of a `RunConfig` into runtime objects.

use cstr_controls::{PidConfig, PidController};
use cstr_project::schema::{
    ControllerDef, FeedDef, InitialDef, IntegratorDef, ReactorDef, RunConfig,
};
use cstr_reactor::{InputVector, ReactorModel, ReactorParameters, ReactorState};
use cstr_sim::{IntegratorType, SetpointChange, SimOptions, SimulationLoop};

use crate::error::AppResult;

pub fn build_reactor(def: &ReactorDef) -> AppResult<ReactorModel> {
    let params = ReactorParameters::new(
        def.volume,
        def.heat_capacity,
        def.density,
        def.rate_factor,
        def.activation_energy,
        def.enthalpy,
        def.heat_transfer,
    )?
    .with_gas_constant(def.gas_constant)?;
    Ok(ReactorModel::new(params)?)
}

pub fn build_feed(def: &FeedDef) -> AppResult<InputVector> {
    Ok(InputVector::new(
        def.flow,
        def.concentration,
        def.temperature,
        def.coolant_temperature,
    )?)
}

pub fn build_controller(def: &ControllerDef) -> AppResult<PidController> {
    let config = PidConfig::new(
        def.kp,
        def.ki,
        def.kd,
        def.setpoint,
        def.dt,
        def.output_lower,
        def.output_upper,
    )?
    .with_settling_threshold(def.settling_threshold)?;
    Ok(PidController::new(config)?)
}

pub fn build_initial_state(def: &InitialDef) -> AppResult<ReactorState> {
    Ok(ReactorState::checked(def.concentration, def.temperature)?)
}

fn integrator_type(def: IntegratorDef) -> IntegratorType {
    match def {
        IntegratorDef::Rk4 => IntegratorType::RK4,
        IntegratorDef::ForwardEuler => IntegratorType::ForwardEuler,
    }
}

/// Fresh, idle simulation loop for `config`.
pub fn build_simulation(config: &RunConfig) -> AppResult<SimulationLoop> {
    cstr_project::validate_config(config)?;

    let options = SimOptions {
        total_steps: config.simulation.n_steps,
        substeps: config.simulation.substeps,
        integrator: integrator_type(config.simulation.integrator),
        setpoint_changes: config
            .simulation
            .setpoint_changes
            .iter()
            .map(|c| SetpointChange {
                step: c.step,
                setpoint: c.setpoint,
            })
            .collect(),
    };

    Ok(SimulationLoop::new(
        build_reactor(&config.reactor)?,
        build_controller(&config.controller)?,
        build_feed(&config.feed)?,
        build_initial_state(&config.initial)?,
        options,
    )?)
}
