//! Finite difference Jacobians.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Perturbation for column `j`, scaled to the magnitude of `x[j]`.
fn perturbation(xj: f64, epsilon: f64) -> f64 {
    epsilon * xj.abs().max(1.0)
}

fn check_epsilon(epsilon: f64) -> SolverResult<()> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(SolverError::ProblemSetup {
            what: format!("finite difference epsilon must be positive, got {epsilon}"),
        })
    }
}

/// Central-difference Jacobian: column j is `(f(x + h e_j) - f(x - h e_j)) / 2h`.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    check_epsilon(epsilon)?;
    let m = f(x)?.len();
    let mut jac = DMatrix::zeros(m, x.len());

    for j in 0..x.len() {
        let h = perturbation(x[j], epsilon);

        let mut x_plus = x.clone();
        x_plus[j] += h;
        let mut x_minus = x.clone();
        x_minus[j] -= h;

        let column = (f(&x_plus)? - f(&x_minus)?) / (2.0 * h);
        jac.set_column(j, &column);
    }

    Ok(jac)
}
