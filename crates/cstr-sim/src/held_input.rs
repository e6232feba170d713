//! Reactor dynamics with the input held constant over an interval.

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use cstr_reactor::{InputVector, ReactorModel, ReactorState};

/// Zero-order hold of an `InputVector` applied to a `ReactorModel`.
#[derive(Debug, Clone, Copy)]
pub struct HeldInputModel<'a> {
    pub reactor: &'a ReactorModel,
    pub inputs: InputVector,
}

impl<'a> HeldInputModel<'a> {
    pub fn new(reactor: &'a ReactorModel, inputs: InputVector) -> Self {
        Self { reactor, inputs }
    }
}

impl TransientModel for HeldInputModel<'_> {
    type State = ReactorState;

    fn rhs(&self, t: f64, x: &ReactorState) -> SimResult<ReactorState> {
        let dxdt = self.reactor.dynamics(t, x, &self.inputs);
        if dxdt.is_finite() {
            Ok(dxdt)
        } else {
            Err(SimError::NonFiniteDerivative { time: t })
        }
    }

    fn add(&self, a: &ReactorState, b: &ReactorState) -> ReactorState {
        a.add(b)
    }

    fn scale(&self, a: &ReactorState, scale: f64) -> ReactorState {
        a.scale(scale)
    }
}
