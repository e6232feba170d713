//! Closed-loop simulation runner.

use crate::error::{SimError, SimResult};
use crate::held_input::HeldInputModel;
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::trajectory::{Trajectory, TrajectoryPoint};
use cstr_controls::{PidController, SampleConfig};
use cstr_core::ensure_finite;
use cstr_reactor::{InputVector, ReactorModel, ReactorState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

/// Setpoint change applied before the controller update of `step`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetpointChange {
    pub step: usize,
    pub setpoint: f64,
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Number of control steps after which the run is complete
    pub total_steps: usize,
    /// Integrator sub-steps per control interval
    pub substeps: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
    /// Scheduled setpoint changes
    pub setpoint_changes: Vec<SetpointChange>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            total_steps: 50,
            substeps: 20,
            integrator: IntegratorType::default(),
            setpoint_changes: Vec::new(),
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if self.total_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "total_steps must be positive",
            });
        }
        if self.substeps == 0 {
            return Err(SimError::InvalidArg {
                what: "substeps must be positive",
            });
        }
        for change in &self.setpoint_changes {
            ensure_finite(change.setpoint, "scheduled setpoint")
                .map_err(cstr_controls::ControlError::from)?;
        }
        Ok(())
    }
}

/// Lifecycle of a simulation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStatus {
    /// Constructed, no step taken
    Idle,
    /// At least one step taken, more remaining
    Running,
    /// All configured steps taken
    Complete,
    /// A step diverged; the trajectory holds the steps before it
    Failed,
}

/// Controller + reactor stepped together at the controller's sample interval.
#[derive(Debug, Clone)]
pub struct SimulationLoop {
    reactor: ReactorModel,
    controller: PidController,
    feed: InputVector,
    state: ReactorState,
    options: SimOptions,
    sample: SampleConfig,
    status: LoopStatus,
    steps_taken: usize,
    trajectory: Trajectory,
}

impl SimulationLoop {
    pub fn new(
        reactor: ReactorModel,
        controller: PidController,
        feed: InputVector,
        initial_state: ReactorState,
        options: SimOptions,
    ) -> SimResult<Self> {
        options.validate()?;
        feed.validate()?;
        let state = ReactorState::checked(initial_state.concentration, initial_state.temperature)?;
        let sample = controller.config().sample;

        Ok(Self {
            reactor,
            controller,
            feed,
            state,
            options,
            sample,
            status: LoopStatus::Idle,
            steps_taken: 0,
            trajectory: Trajectory::new(0.0, state),
        })
    }

    /// Take one control step and return the new reactor state.
    pub fn step(&mut self) -> SimResult<ReactorState> {
        match self.status {
            LoopStatus::Complete => {
                return Err(SimError::Usage {
                    what: "step called after the simulation completed",
                });
            }
            LoopStatus::Failed => {
                return Err(SimError::Usage {
                    what: "step called after the simulation failed",
                });
            }
            LoopStatus::Idle => {
                tracing::info!(
                    total_steps = self.options.total_steps,
                    dt = self.sample.dt,
                    "simulation started"
                );
                self.status = LoopStatus::Running;
            }
            LoopStatus::Running => {}
        }

        let step = self.steps_taken;
        let t0 = self.time();
        let setpoint_override = self.scheduled_setpoint(step);

        let command = match self
            .controller
            .update(self.state.temperature, setpoint_override)
        {
            Ok(command) => command,
            Err(e) => return Err(self.fail(step, e.to_string())),
        };
        let error = self.controller.previous_error();
        let setpoint = self.controller.setpoint();

        // The controller clamps already; the loop does not rely on it.
        let command = self.controller.config().clamp_output(command);
        if !command.is_finite() {
            return Err(self.fail(step, format!("non-finite command {command}")));
        }

        let inputs = self.feed.with_coolant(command);
        let next = match self.advance(t0, &inputs) {
            Ok(next) => next,
            Err(e) => return Err(self.fail(step, e.to_string())),
        };
        if !next.is_physical() {
            return Err(self.fail(
                step,
                format!(
                    "non-physical state (concentration = {}, temperature = {})",
                    next.concentration, next.temperature
                ),
            ));
        }

        self.state = next;
        self.steps_taken += 1;
        self.trajectory.push(TrajectoryPoint {
            step,
            time: self.time(),
            state: next,
            command,
            error,
            setpoint,
        });

        tracing::debug!(
            step,
            time = self.time(),
            temperature = next.temperature,
            concentration = next.concentration,
            command,
            error,
            "step committed"
        );

        if self.steps_taken == self.options.total_steps {
            self.status = LoopStatus::Complete;
            tracing::info!(steps = self.steps_taken, "simulation complete");
        }

        Ok(next)
    }

    /// Take exactly `n_steps` steps, stopping at the first error.
    ///
    /// On error the trajectory keeps every step committed before it.
    pub fn run(&mut self, n_steps: usize) -> SimResult<&Trajectory> {
        for _ in 0..n_steps {
            self.step()?;
        }
        Ok(&self.trajectory)
    }

    /// Take all remaining configured steps.
    pub fn run_to_completion(&mut self) -> SimResult<&Trajectory> {
        let remaining = self.options.total_steps - self.steps_taken;
        self.run(remaining)
    }

    fn advance(&self, t0: f64, inputs: &InputVector) -> SimResult<ReactorState> {
        let model = HeldInputModel::new(&self.reactor, *inputs);
        let h = self.sample.dt / self.options.substeps as f64;
        let mut x = self.state;
        for i in 0..self.options.substeps {
            let t = t0 + i as f64 * h;
            x = match self.options.integrator {
                IntegratorType::RK4 => RK4.step(&model, t, &x, h)?,
                IntegratorType::ForwardEuler => ForwardEuler.step(&model, t, &x, h)?,
            };
        }
        Ok(x)
    }

    fn scheduled_setpoint(&self, step: usize) -> Option<f64> {
        self.options
            .setpoint_changes
            .iter()
            .rev()
            .find(|c| c.step == step)
            .map(|c| c.setpoint)
    }

    fn fail(&mut self, step: usize, what: String) -> SimError {
        tracing::warn!(step, reason = %what, "simulation diverged");
        self.status = LoopStatus::Failed;
        SimError::Diverged { step, what }
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn state(&self) -> ReactorState {
        self.state
    }

    /// Simulation time after the committed steps.
    pub fn time(&self) -> f64 {
        self.trajectory.initial_time + self.sample.elapsed(self.steps_taken)
    }

    pub fn dt(&self) -> f64 {
        self.sample.dt
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    pub fn reactor(&self) -> &ReactorModel {
        &self.reactor
    }

    pub fn feed(&self) -> &InputVector {
        &self.feed
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn controller(&self) -> &PidController {
        &self.controller
    }

    /// Controller performance metrics over the steps taken so far.
    pub fn metrics(&self) -> BTreeMap<String, f64> {
        self.controller.metrics()
    }

    pub fn into_parts(self) -> (Trajectory, PidController) {
        (self.trajectory, self.controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstr_controls::PidConfig;
    use cstr_reactor::ReactorParameters;

    fn reactor() -> ReactorModel {
        ReactorModel::new(ReactorParameters::default()).unwrap()
    }

    fn pid() -> PidController {
        PidController::new(PidConfig::new(5.0, 0.2, 1.0, 350.0, 1.0, 280.0, 400.0).unwrap())
            .unwrap()
    }

    fn sim(options: SimOptions) -> SimulationLoop {
        SimulationLoop::new(
            reactor(),
            pid(),
            InputVector::default(),
            ReactorState::new(1.0, 320.0),
            options,
        )
        .unwrap()
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.total_steps, 50);
        assert_eq!(opts.substeps, 20);
        assert_eq!(opts.integrator, IntegratorType::RK4);
    }

    #[test]
    fn sim_options_invalid() {
        let build = |options| {
            SimulationLoop::new(
                reactor(),
                pid(),
                InputVector::default(),
                ReactorState::new(1.0, 320.0),
                options,
            )
        };
        assert!(build(SimOptions {
            total_steps: 0,
            ..SimOptions::default()
        })
        .is_err());
        assert!(build(SimOptions {
            substeps: 0,
            ..SimOptions::default()
        })
        .is_err());
    }

    #[test]
    fn rejects_unphysical_initial_state() {
        let err = SimulationLoop::new(
            reactor(),
            pid(),
            InputVector::default(),
            ReactorState::new(-1.0, 320.0),
            SimOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Reactor(_)));
    }

    #[test]
    fn status_transitions() {
        let mut s = sim(SimOptions {
            total_steps: 2,
            ..SimOptions::default()
        });
        assert_eq!(s.status(), LoopStatus::Idle);
        s.step().unwrap();
        assert_eq!(s.status(), LoopStatus::Running);
        s.step().unwrap();
        assert_eq!(s.status(), LoopStatus::Complete);
        assert!(matches!(s.step(), Err(SimError::Usage { .. })));
        assert_eq!(s.trajectory().len(), 2);
    }

    #[test]
    fn point_records_error_and_command() {
        let mut s = sim(SimOptions::default());
        s.step().unwrap();
        let p = s.trajectory().points()[0];
        assert_eq!(p.step, 0);
        assert_eq!(p.time, 1.0);
        assert_eq!(p.error, 30.0);
        assert_eq!(p.command, 280.0);
        assert_eq!(p.setpoint, 350.0);
    }

    #[test]
    fn scheduled_setpoint_applies_from_its_step() {
        let mut s = sim(SimOptions {
            total_steps: 4,
            setpoint_changes: vec![SetpointChange {
                step: 2,
                setpoint: 345.0,
            }],
            ..SimOptions::default()
        });
        let traj = s.run(4).unwrap();
        let setpoints: Vec<f64> = traj.points().iter().map(|p| p.setpoint).collect();
        assert_eq!(setpoints, vec![350.0, 350.0, 345.0, 345.0]);
    }

    #[test]
    fn run_to_completion_takes_remaining_steps() {
        let mut s = sim(SimOptions {
            total_steps: 5,
            ..SimOptions::default()
        });
        s.run(2).unwrap();
        s.run_to_completion().unwrap();
        assert_eq!(s.steps_taken(), 5);
        assert_eq!(s.status(), LoopStatus::Complete);
    }

    #[test]
    fn overflowing_derivative_fails_the_loop() {
        // Temperature-independent rate so large the heat term overflows.
        let params = ReactorParameters {
            rate_factor: 1e308,
            activation_energy: 0.0,
            ..ReactorParameters::default()
        };
        let mut s = SimulationLoop::new(
            ReactorModel::new(params).unwrap(),
            pid(),
            InputVector::default(),
            ReactorState::new(1.0, 320.0),
            SimOptions::default(),
        )
        .unwrap();

        let err = s.step().unwrap_err();
        match err {
            SimError::Diverged { step, what } => {
                assert_eq!(step, 0);
                assert!(what.contains("Non-finite derivative"), "{what}");
            }
            other => panic!("expected divergence, got {other:?}"),
        }
        assert_eq!(s.status(), LoopStatus::Failed);
        assert!(s.trajectory().is_empty());
        assert!(matches!(s.step(), Err(SimError::Usage { .. })));
    }

    #[test]
    fn time_counts_whole_control_intervals() {
        let mut s = sim(SimOptions {
            total_steps: 3,
            ..SimOptions::default()
        });
        assert_eq!(s.time(), 0.0);
        s.run(3).unwrap();
        assert_eq!(s.time(), s.controller().config().sample.elapsed(3));
        assert_eq!(s.time(), 3.0);
    }
}
