//! Reactor state and exogenous inputs.

use crate::error::ReactorResult;
use cstr_core::{ensure_finite, ensure_non_negative, ensure_positive};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Reactant concentration and reactor temperature.
///
/// Also used for state derivatives, where the sign restrictions do not apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactorState {
    pub concentration: f64,
    pub temperature: f64,
}

impl ReactorState {
    pub fn new(concentration: f64, temperature: f64) -> Self {
        Self {
            concentration,
            temperature,
        }
    }

    /// Validated physical state: concentration >= 0, temperature > 0.
    pub fn checked(concentration: f64, temperature: f64) -> ReactorResult<Self> {
        ensure_non_negative(concentration, "concentration must be non-negative")?;
        ensure_positive(temperature, "temperature must be positive")?;
        Ok(Self::new(concentration, temperature))
    }

    pub fn is_finite(&self) -> bool {
        self.concentration.is_finite() && self.temperature.is_finite()
    }

    pub fn is_physical(&self) -> bool {
        self.is_finite() && self.concentration >= 0.0 && self.temperature > 0.0
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.concentration + other.concentration,
            self.temperature + other.temperature,
        )
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.concentration * factor, self.temperature * factor)
    }

    /// Euclidean norm, used for residual checks.
    pub fn norm(&self) -> f64 {
        self.concentration.hypot(self.temperature)
    }

    pub(crate) fn to_dvector(self) -> DVector<f64> {
        DVector::from_vec(vec![self.concentration, self.temperature])
    }

    pub(crate) fn from_dvector(x: &DVector<f64>) -> Self {
        Self::new(x[0], x[1])
    }
}

/// Exogenous inputs: feed stream plus coolant temperature.
///
/// `coolant_temperature` is the manipulated variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputVector {
    pub feed_flow: f64,
    pub feed_concentration: f64,
    pub feed_temperature: f64,
    pub coolant_temperature: f64,
}

impl Default for InputVector {
    fn default() -> Self {
        Self {
            feed_flow: 10.0,
            feed_concentration: 1.0,
            feed_temperature: 350.0,
            coolant_temperature: 300.0,
        }
    }
}

impl InputVector {
    pub fn new(
        feed_flow: f64,
        feed_concentration: f64,
        feed_temperature: f64,
        coolant_temperature: f64,
    ) -> ReactorResult<Self> {
        let inputs = Self {
            feed_flow,
            feed_concentration,
            feed_temperature,
            coolant_temperature,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> ReactorResult<()> {
        ensure_non_negative(self.feed_flow, "feed_flow must be non-negative")?;
        ensure_non_negative(
            self.feed_concentration,
            "feed_concentration must be non-negative",
        )?;
        ensure_positive(self.feed_temperature, "feed_temperature must be positive")?;
        ensure_finite(self.coolant_temperature, "coolant_temperature")?;
        Ok(())
    }

    /// Same feed, new coolant temperature.
    pub fn with_coolant(&self, coolant_temperature: f64) -> Self {
        Self {
            coolant_temperature,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_state_bounds() {
        assert!(ReactorState::checked(0.0, 300.0).is_ok());
        assert!(ReactorState::checked(-0.1, 300.0).is_err());
        assert!(ReactorState::checked(1.0, 0.0).is_err());
        assert!(ReactorState::checked(f64::NAN, 300.0).is_err());
    }

    #[test]
    fn arithmetic() {
        let a = ReactorState::new(1.0, 300.0);
        let b = ReactorState::new(0.5, -10.0);
        assert_eq!(a.add(&b), ReactorState::new(1.5, 290.0));
        assert_eq!(a.scale(2.0), ReactorState::new(2.0, 600.0));
    }

    #[test]
    fn physical_and_finite_checks() {
        assert!(ReactorState::new(0.2, 330.0).is_physical());
        assert!(!ReactorState::new(0.2, f64::INFINITY).is_finite());
        assert!(!ReactorState::new(-0.2, 330.0).is_physical());
    }

    #[test]
    fn with_coolant_keeps_feed() {
        let u = InputVector::default().with_coolant(285.0);
        assert_eq!(u.coolant_temperature, 285.0);
        assert_eq!(u.feed_flow, 10.0);
        assert_eq!(u.feed_temperature, 350.0);
    }

    #[test]
    fn input_validation() {
        assert!(InputVector::new(10.0, 1.0, 350.0, 300.0).is_ok());
        assert!(InputVector::new(-1.0, 1.0, 350.0, 300.0).is_err());
        assert!(InputVector::new(10.0, 1.0, 0.0, 300.0).is_err());
        assert!(InputVector::new(10.0, 1.0, 350.0, f64::NAN).is_err());
    }
}
