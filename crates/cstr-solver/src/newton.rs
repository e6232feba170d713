//! Newton solver with admissibility-constrained line search.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Newton solver configuration.
#[derive(Clone, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (0 disables)
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            rel_tol: 1e-6,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

/// Newton iteration result.
#[derive(Clone, Debug)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Newton solver with backtracking line search.
///
/// A trial point is accepted once it is `admissible` and reduces the residual
/// norm. If backtracking runs out of iterations the last trial is taken as-is,
/// so the caller must still check the returned point.
pub fn newton_solve<F, J, A>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    admissible: A,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
    A: Fn(&DVector<f64>) -> bool,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    if r.len() != x.len() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "residual has {} entries but unknown vector has {}",
                r.len(),
                x.len()
            ),
        });
    }
    let mut r_norm = r.norm();
    if !r_norm.is_finite() {
        return Err(SolverError::InvalidState {
            what: "initial residual is not finite".to_string(),
        });
    }
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            tracing::debug!(iterations = iter, residual = r_norm, "newton converged");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolverError::Numeric {
                what: "Jacobian solve failed".to_string(),
            })?;

        let mut alpha = 1.0;
        let mut x_new = &x + alpha * &dx;
        let mut r_new = residual_fn(&x_new)?;
        let mut r_new_norm = r_new.norm();

        for _ in 0..config.max_line_search_iters {
            if admissible(&x_new) && r_new_norm.is_finite() && r_new_norm < r_norm {
                break;
            }

            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new)?;
            r_new_norm = r_new.norm();
        }

        tracing::trace!(iteration = iter, alpha, residual = r_new_norm, "newton step");

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        if !r_norm.is_finite() {
            return Err(SolverError::Numeric {
                what: format!("Residual became non-finite at iteration {}", iter),
            });
        }

        if alpha < 1e-10 {
            return Err(SolverError::ConvergenceFailed {
                what: format!("Line search stagnated at iteration {}", iter),
            });
        }
    }

    if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
            converged: true,
        });
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}
