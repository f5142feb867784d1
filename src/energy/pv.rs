//! # Photovoltaic Generation Model
//!
//! Converts plane-of-array irradiance into electrical power and, over an
//! interval, into energy:
//!
//! ```text
//! P = G × A × η_module × η_system × k_weather
//! E = P × Δt / 3.6e6            (kWh)
//! ```
//!
//! `k_weather` is the efficiency multiplier from temperature and wind
//! derating; it is 1.0 when no weather is supplied.

use serde::{Deserialize, Serialize};

use crate::domain::{Energy, Irradiance, Power};
use crate::error::ModelError;

/// PV array description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvArray {
    /// Total panel area (m²)
    pub panel_area_m2: f64,
    /// Module conversion efficiency (0.0-1.0)
    pub module_efficiency: f64,
    /// Balance-of-system efficiency: inverter, wiring, soiling (0.0-1.0)
    pub system_efficiency: f64,
}

impl Default for PvArray {
    fn default() -> Self {
        Self {
            panel_area_m2: 10.0,
            module_efficiency: 0.18,
            system_efficiency: 0.90,
        }
    }
}

impl PvArray {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.panel_area_m2.is_finite() || self.panel_area_m2 < 0.0 {
            return Err(ModelError::invalid(
                "panel_area_m2",
                self.panel_area_m2,
                "must be finite and >= 0",
            ));
        }
        check_efficiency("module_efficiency", self.module_efficiency)?;
        check_efficiency("system_efficiency", self.system_efficiency)?;
        Ok(())
    }

    /// Combined area × efficiency product (m²)
    pub fn effective_area_m2(&self) -> f64 {
        self.panel_area_m2 * self.module_efficiency * self.system_efficiency
    }
}

fn check_efficiency(name: &'static str, value: f64) -> Result<(), ModelError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ModelError::invalid(name, value, "must be within [0, 1]"));
    }
    Ok(())
}

/// Stateless PV generation model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvGenerationModel {
    array: PvArray,
}

impl PvGenerationModel {
    pub fn new(array: PvArray) -> Self {
        Self { array }
    }

    pub fn array(&self) -> &PvArray {
        &self.array
    }

    /// Instantaneous PV power for the given irradiance
    pub fn power(&self, irradiance: Irradiance) -> Power {
        self.derated_power(irradiance, 1.0)
    }

    /// PV power with an extra efficiency multiplier folded in
    ///
    /// Never negative: a multiplier driven below zero by extreme temperatures
    /// yields zero output.
    pub fn derated_power(&self, irradiance: Irradiance, efficiency_multiplier: f64) -> Power {
        let watts = irradiance.as_watts_per_m2()
            * self.array.effective_area_m2()
            * efficiency_multiplier;
        Power::watts(watts.max(0.0))
    }

    /// PV energy over `elapsed_seconds`
    pub fn energy(&self, irradiance: Irradiance, elapsed_seconds: f64) -> Energy {
        self.power(irradiance).energy_over(elapsed_seconds)
    }
}
