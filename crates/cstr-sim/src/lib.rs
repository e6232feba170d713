//! Closed-loop transient simulation of the CSTR.
//!
//! Provides:
//! - `TransientModel` trait and fixed-step integrators (RK4, forward Euler)
//! - `HeldInputModel`: reactor dynamics under a zero-order-held input
//! - `SimulationLoop`: controller + reactor stepping with trajectory recording

pub mod error;
pub mod held_input;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod trajectory;

pub use error::{SimError, SimResult};
pub use held_input::HeldInputModel;
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::TransientModel;
pub use sim::{IntegratorType, LoopStatus, SetpointChange, SimOptions, SimulationLoop};
pub use trajectory::{Trajectory, TrajectoryPoint};
