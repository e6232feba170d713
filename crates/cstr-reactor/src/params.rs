//! Physical and kinetic parameters of the reactor.

use crate::error::ReactorResult;
use cstr_core::{ensure_non_negative, ensure_positive};
use serde::{Deserialize, Serialize};

/// Universal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;

/// Fixed parameters for one simulation run.
///
/// `enthalpy` follows the thermodynamic sign convention: heat released by the
/// reaction is `-enthalpy * rate`, so exothermic reactions have a negative
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactorParameters {
    /// Reactor volume
    pub volume: f64,
    /// Specific heat capacity of the contents
    pub heat_capacity: f64,
    /// Density of the contents
    pub density: f64,
    /// Arrhenius pre-exponential factor (1/time)
    pub rate_factor: f64,
    /// Activation energy (J/mol)
    pub activation_energy: f64,
    /// Reaction enthalpy (J/mol)
    pub enthalpy: f64,
    /// Jacket heat-transfer coefficient times area (UA)
    pub heat_transfer: f64,
    /// Gas constant in the Arrhenius exponent
    pub gas_constant: f64,
}

impl Default for ReactorParameters {
    fn default() -> Self {
        Self {
            volume: 1.0,
            heat_capacity: 4.18,
            density: 1000.0,
            rate_factor: 100.0,
            activation_energy: 50_000.0,
            enthalpy: 60_000.0,
            heat_transfer: 500.0,
            gas_constant: GAS_CONSTANT,
        }
    }
}

impl ReactorParameters {
    /// Build and validate a parameter set with the standard gas constant.
    pub fn new(
        volume: f64,
        heat_capacity: f64,
        density: f64,
        rate_factor: f64,
        activation_energy: f64,
        enthalpy: f64,
        heat_transfer: f64,
    ) -> ReactorResult<Self> {
        let params = Self {
            volume,
            heat_capacity,
            density,
            rate_factor,
            activation_energy,
            enthalpy,
            heat_transfer,
            gas_constant: GAS_CONSTANT,
        };
        params.validate()?;
        Ok(params)
    }

    /// Override the gas constant (e.g. for a different energy unit).
    pub fn with_gas_constant(mut self, gas_constant: f64) -> ReactorResult<Self> {
        self.gas_constant = ensure_positive(gas_constant, "gas_constant must be positive")?;
        Ok(self)
    }

    pub fn validate(&self) -> ReactorResult<()> {
        ensure_positive(self.volume, "volume must be positive")?;
        ensure_positive(self.heat_capacity, "heat_capacity must be positive")?;
        ensure_positive(self.density, "density must be positive")?;
        ensure_positive(self.rate_factor, "rate_factor must be positive")?;
        ensure_non_negative(
            self.activation_energy,
            "activation_energy must be non-negative",
        )?;
        cstr_core::ensure_finite(self.enthalpy, "enthalpy")?;
        ensure_positive(self.heat_transfer, "heat_transfer must be positive")?;
        ensure_positive(self.gas_constant, "gas_constant must be positive")?;
        Ok(())
    }

    /// Thermal mass per unit volume, rho * Cp.
    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.density * self.heat_capacity
    }

    /// Jacket exchange rate UA / (V rho Cp), in 1/time.
    pub fn jacket_rate(&self) -> f64 {
        self.heat_transfer / (self.volume * self.volumetric_heat_capacity())
    }
}
