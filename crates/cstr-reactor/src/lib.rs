//! Continuous stirred-tank reactor model.
//!
//! A single first-order irreversible reaction A -> B with Arrhenius kinetics,
//! convective feed exchange and jacket cooling. The model is a pure function
//! of (state, inputs); it holds parameters only, never simulation state.
//!
//! Units are whatever consistent system the caller picks. The defaults use
//! litres, grams, joules, kelvin and minutes.

pub mod error;
pub mod model;
pub mod params;
pub mod state;
pub mod steady;

pub use error::{ReactorError, ReactorResult};
pub use model::ReactorModel;
pub use params::{GAS_CONSTANT, ReactorParameters};
pub use state::{InputVector, ReactorState};
