//! Feedback control primitives for cstrflow.
//!
//! The controller is a sampled PID with:
//! - derivative on measurement (no derivative kick on setpoint changes)
//! - output clamping to actuator bounds
//! - conditional-integration anti-windup (integral frozen while saturated)
//! - error/output history for performance metrics

pub mod controller;
pub mod error;
pub mod metrics;
pub mod sampled;

pub use controller::{PidConfig, PidController, PidTerms};
pub use error::{ControlError, ControlResult};
pub use metrics::{ControlMetrics, DEFAULT_SETTLING_THRESHOLD, settling_time};
pub use sampled::SampleConfig;
