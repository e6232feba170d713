//! Nonlinear algebraic solvers for cstrflow.
//!
//! Provides a damped Newton iteration with backtracking line search and an
//! admissibility predicate, plus a central-difference Jacobian for checking
//! analytic ones.

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use jacobian::central_difference_jacobian;
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
