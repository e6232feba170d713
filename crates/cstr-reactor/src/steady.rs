//! Steady-state solve: find x with dynamics(., x, u) = 0.

use crate::error::{ReactorError, ReactorResult};
use crate::model::ReactorModel;
use crate::state::{InputVector, ReactorState};
use cstr_solver::{NewtonConfig, SolverResult, newton_solve};
use nalgebra::{DMatrix, DVector};

/// Newton settings for the 2x2 steady-state system.
///
/// The relative criterion is off: a steady state is only useful if the
/// derivative is actually small in absolute terms.
pub fn steady_newton_config() -> NewtonConfig {
    NewtonConfig {
        max_iterations: 100,
        abs_tol: 1e-9,
        rel_tol: 0.0,
        line_search_beta: 0.5,
        max_line_search_iters: 30,
    }
}

impl ReactorModel {
    /// Steady state for held inputs, starting from the feed conditions.
    pub fn steady_state(&self, inputs: &InputVector) -> ReactorResult<ReactorState> {
        let guess = ReactorState::new(inputs.feed_concentration, inputs.feed_temperature);
        self.steady_state_from(inputs, guess)
    }

    /// Steady state from a caller-supplied initial guess.
    pub fn steady_state_from(
        &self,
        inputs: &InputVector,
        guess: ReactorState,
    ) -> ReactorResult<ReactorState> {
        self.steady_state_with(inputs, guess, &steady_newton_config())
    }

    pub fn steady_state_with(
        &self,
        inputs: &InputVector,
        guess: ReactorState,
        config: &NewtonConfig,
    ) -> ReactorResult<ReactorState> {
        inputs.validate()?;
        let guess = ReactorState::checked(guess.concentration, guess.temperature)?;

        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(self
                .dynamics(0.0, &ReactorState::from_dvector(x), inputs)
                .to_dvector())
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            let j = self.jacobian(&ReactorState::from_dvector(x), inputs);
            Ok(DMatrix::from_iterator(2, 2, j.iter().copied()))
        };
        let physical = |x: &DVector<f64>| ReactorState::from_dvector(x).is_physical();

        // The physical region is only a preference for the line search. When
        // no physical root is reachable, solve again over all finite states so
        // an unphysical root is reported as such.
        let result = match newton_solve(guess.to_dvector(), &residual, &jacobian, physical, config) {
            Ok(result) => result,
            Err(restricted) => {
                let finite = |x: &DVector<f64>| x.iter().all(|v| v.is_finite());
                match newton_solve(guess.to_dvector(), &residual, &jacobian, finite, config) {
                    Ok(result) => result,
                    Err(_) => return Err(restricted.into()),
                }
            }
        };
        let root = classify_root(ReactorState::from_dvector(&result.x))?;

        tracing::debug!(
            iterations = result.iterations,
            residual = result.residual_norm,
            concentration = root.concentration,
            temperature = root.temperature,
            "steady state found"
        );
        Ok(root)
    }
}

/// Accept a converged root only if it is a physical state.
pub fn classify_root(root: ReactorState) -> ReactorResult<ReactorState> {
    if root.is_physical() {
        Ok(root)
    } else {
        Err(ReactorError::UnphysicalRoot {
            concentration: root.concentration,
            temperature: root.temperature,
        })
    }
}
