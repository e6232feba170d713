//! CSTR mass and energy balances.

use crate::error::ReactorResult;
use crate::params::ReactorParameters;
use crate::state::{InputVector, ReactorState};
use nalgebra::Matrix2;

/// Reactor model: parameters plus the right-hand side of the balance ODEs.
///
/// ```text
/// dCA/dt = q/V (CAf - CA) - k(T) CA
/// dT/dt  = q/V (Tf - T) + (-dHr) k(T) CA / (rho Cp) + UA (Tc - T) / (V rho Cp)
/// k(T)   = k0 exp(-Ea / (R T))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorModel {
    params: ReactorParameters,
}

impl ReactorModel {
    pub fn new(params: ReactorParameters) -> ReactorResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ReactorParameters {
        &self.params
    }

    /// Arrhenius rate constant at temperature `t`.
    pub fn rate_constant(&self, temperature: f64) -> f64 {
        let p = &self.params;
        p.rate_factor * (-p.activation_energy / (p.gas_constant * temperature)).exp()
    }

    /// State derivative at time `t`. The system is autonomous; `t` is accepted
    /// so the signature matches generic ODE right-hand sides.
    pub fn dynamics(&self, _t: f64, state: &ReactorState, inputs: &InputVector) -> ReactorState {
        let p = &self.params;
        let ca = state.concentration;
        let temp = state.temperature;

        let dilution = inputs.feed_flow / p.volume;
        let rate = self.rate_constant(temp) * ca;

        let dca = dilution * (inputs.feed_concentration - ca) - rate;
        let dtemp = dilution * (inputs.feed_temperature - temp)
            + (-p.enthalpy) * rate / p.volumetric_heat_capacity()
            + p.jacket_rate() * (inputs.coolant_temperature - temp);

        ReactorState::new(dca, dtemp)
    }

    /// Analytic Jacobian of [`dynamics`](Self::dynamics) with respect to
    /// (concentration, temperature).
    pub fn jacobian(&self, state: &ReactorState, inputs: &InputVector) -> Matrix2<f64> {
        let p = &self.params;
        let ca = state.concentration;
        let temp = state.temperature;

        let dilution = inputs.feed_flow / p.volume;
        let k = self.rate_constant(temp);
        let dk_dt = k * p.activation_energy / (p.gas_constant * temp * temp);
        let heat_gain = -p.enthalpy / p.volumetric_heat_capacity();

        Matrix2::new(
            -dilution - k,
            -dk_dt * ca,
            heat_gain * k,
            -dilution + heat_gain * dk_dt * ca - p.jacket_rate(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstr_solver::{SolverResult, central_difference_jacobian};
    use nalgebra::DVector;

    fn model() -> ReactorModel {
        ReactorModel::new(ReactorParameters::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_params() {
        let params = ReactorParameters {
            density: 0.0,
            ..ReactorParameters::default()
        };
        assert!(ReactorModel::new(params).is_err());
    }

    #[test]
    fn rate_constant_increases_with_temperature() {
        let m = model();
        assert!(m.rate_constant(400.0) > m.rate_constant(350.0));
        assert!(m.rate_constant(350.0) > 0.0);
    }

    #[test]
    fn pure_feed_exchange_without_reaction() {
        // Zero concentration removes the reaction term.
        let m = model();
        let u = InputVector::new(10.0, 0.0, 350.0, 350.0).unwrap();
        let d = m.dynamics(0.0, &ReactorState::new(0.0, 350.0), &u);
        assert_eq!(d.concentration, 0.0);
        assert!(d.temperature.abs() < 1e-12);
    }

    #[test]
    fn colder_coolant_cools_reactor() {
        let m = model();
        let x = ReactorState::new(1.0, 350.0);
        let warm = m.dynamics(0.0, &x, &InputVector::default().with_coolant(350.0));
        let cold = m.dynamics(0.0, &x, &InputVector::default().with_coolant(280.0));
        assert!(cold.temperature < warm.temperature);
    }

    #[test]
    fn dynamics_is_time_invariant() {
        let m = model();
        let x = ReactorState::new(0.7, 330.0);
        let u = InputVector::default();
        assert_eq!(m.dynamics(0.0, &x, &u), m.dynamics(123.4, &x, &u));
    }

    #[test]
    fn analytic_jacobian_matches_finite_difference() {
        let params = ReactorParameters {
            rate_factor: 7.2e10,
            activation_energy: 72_750.0,
            enthalpy: -50_000.0,
            ..ReactorParameters::default()
        };
        let m = ReactorModel::new(params).unwrap();
        let u = InputVector::default().with_coolant(300.0);
        let x = ReactorState::new(0.5, 360.0);

        let f = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(m.dynamics(0.0, &ReactorState::from_dvector(v), &u).to_dvector())
        };
        let fd = central_difference_jacobian(&x.to_dvector(), f, 1e-6).unwrap();
        let an = m.jacobian(&x, &u);

        for i in 0..2 {
            for j in 0..2 {
                let scale = an[(i, j)].abs().max(1.0);
                assert!(
                    (fd[(i, j)] - an[(i, j)]).abs() / scale < 1e-5,
                    "J[{i},{j}]: fd={} analytic={}",
                    fd[(i, j)],
                    an[(i, j)]
                );
            }
        }
    }
}
