//! Steady-state and open-loop analysis of a configured reactor.

use cstr_project::RunConfig;
use cstr_reactor::{InputVector, ReactorState};
use cstr_sim::{HeldInputModel, Integrator, RK4};
use serde::Serialize;

use crate::compile;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
pub struct SteadySummary {
    pub inputs: InputVector,
    pub state: ReactorState,
    /// Arrhenius rate constant at the steady temperature
    pub rate_constant: f64,
    /// Norm of the state derivative at the returned root
    pub residual_norm: f64,
}

/// Steady state of the configured reactor with the feed held and the coolant
/// at `coolant` (or the configured coolant temperature).
pub fn solve_steady(config: &RunConfig, coolant: Option<f64>) -> AppResult<SteadySummary> {
    cstr_project::validate_config(config)?;
    let reactor = compile::build_reactor(&config.reactor)?;
    let mut inputs = compile::build_feed(&config.feed)?;
    if let Some(tc) = coolant {
        inputs = inputs.with_coolant(tc);
    }

    let state = reactor.steady_state(&inputs)?;
    let residual_norm = reactor.dynamics(0.0, &state, &inputs).norm();
    tracing::info!(
        concentration = state.concentration,
        temperature = state.temperature,
        "steady state solved"
    );

    Ok(SteadySummary {
        inputs,
        state,
        rate_constant: reactor.rate_constant(state.temperature),
        residual_norm,
    })
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct OpenLoopPoint {
    pub time: f64,
    pub state: ReactorState,
}

/// Uncontrolled response from the configured initial state with the coolant
/// held at `coolant` (or the configured coolant temperature).
///
/// Returns `n_points + 1` samples evenly spaced over `[0, t_end]`, each
/// interval integrated with RK4 in `simulation.substeps` sub-steps.
pub fn open_loop_response(
    config: &RunConfig,
    coolant: Option<f64>,
    t_end: f64,
    n_points: usize,
) -> AppResult<Vec<OpenLoopPoint>> {
    cstr_project::validate_config(config)?;
    if !(t_end.is_finite() && t_end > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "t_end must be positive, got {t_end}"
        )));
    }
    if n_points == 0 {
        return Err(AppError::InvalidInput("n_points must be positive".to_string()));
    }

    let reactor = compile::build_reactor(&config.reactor)?;
    let mut inputs = compile::build_feed(&config.feed)?;
    if let Some(tc) = coolant {
        inputs = inputs.with_coolant(tc);
    }
    let model = HeldInputModel::new(&reactor, inputs);

    let interval = t_end / n_points as f64;
    let substeps = config.simulation.substeps;
    let h = interval / substeps as f64;

    let mut state = compile::build_initial_state(&config.initial)?;
    let mut points = Vec::with_capacity(n_points + 1);
    points.push(OpenLoopPoint { time: 0.0, state });

    for i in 0..n_points {
        let t0 = i as f64 * interval;
        for j in 0..substeps {
            state = RK4.step(&model, t0 + j as f64 * h, &state, h)?;
        }
        if !state.is_physical() {
            return Err(AppError::Simulation(format!(
                "open-loop response left the physical region at t = {}",
                (i + 1) as f64 * interval
            )));
        }
        points.push(OpenLoopPoint {
            time: (i + 1) as f64 * interval,
            state,
        });
    }

    Ok(points)
}
