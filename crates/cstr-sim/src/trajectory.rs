//! Recorded closed-loop trajectory.

use cstr_reactor::ReactorState;
use serde::{Deserialize, Serialize};

/// One committed simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// 0-based step index
    pub step: usize,
    /// Time at the end of the step interval
    pub time: f64,
    /// Reactor state at `time`
    pub state: ReactorState,
    /// Coolant temperature held over the interval
    pub command: f64,
    /// Setpoint minus the measurement that produced `command`
    pub error: f64,
    /// Setpoint in force for this step
    pub setpoint: f64,
}

/// Append-only record of a run, ordered by step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub initial_time: f64,
    pub initial_state: ReactorState,
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(initial_time: f64, initial_state: ReactorState) -> Self {
        Self {
            initial_time,
            initial_state,
            points: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, point: TrajectoryPoint) {
        debug_assert_eq!(point.step, self.points.len());
        self.points.push(point);
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// State at the end of the last step, or the initial state.
    pub fn final_state(&self) -> ReactorState {
        self.points
            .last()
            .map_or(self.initial_state, |p| p.state)
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.state.temperature).collect()
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.state.concentration).collect()
    }

    pub fn commands(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.command).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.error).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(step: usize, temperature: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            step,
            time: (step + 1) as f64,
            state: ReactorState::new(1.0, temperature),
            command: 300.0,
            error: 350.0 - temperature,
            setpoint: 350.0,
        }
    }

    #[test]
    fn empty_trajectory_reports_initial_state() {
        let traj = Trajectory::new(0.0, ReactorState::new(1.0, 320.0));
        assert!(traj.is_empty());
        assert_eq!(traj.final_state(), ReactorState::new(1.0, 320.0));
    }

    #[test]
    fn series_follow_insertion_order() {
        let mut traj = Trajectory::new(0.0, ReactorState::new(1.0, 320.0));
        traj.push(point(0, 330.0));
        traj.push(point(1, 340.0));
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.times(), vec![1.0, 2.0]);
        assert_eq!(traj.temperatures(), vec![330.0, 340.0]);
        assert_eq!(traj.errors(), vec![20.0, 10.0]);
        assert_eq!(traj.final_state().temperature, 340.0);
    }
}
