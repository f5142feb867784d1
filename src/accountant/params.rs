use serde::{Deserialize, Serialize};

use crate::energy::PvArray;
use crate::error::ModelError;
use crate::weather::DeratingCoefficients;

/// Immutable configuration of an [`EnergyAccountant`](super::EnergyAccountant)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// PV array (area and efficiencies)
    pub pv: PvArray,
    /// Grid carbon intensity (gCO2/kWh)
    pub grid_carbon_intensity_g_per_kwh: f64,
    /// Water consumed per kWh of grid electricity (L/kWh)
    pub water_intensity_l_per_kwh: f64,
    /// Weather derating coefficients
    #[serde(default)]
    pub derating: DeratingCoefficients,
    /// Discretisation step for fixed-step accounting (s)
    #[serde(default)]
    pub fixed_step_seconds: Option<f64>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            pv: PvArray::default(),
            grid_carbon_intensity_g_per_kwh: 100.0,
            water_intensity_l_per_kwh: 2.0,
            derating: DeratingCoefficients::default(),
            fixed_step_seconds: None,
        }
    }
}

impl ModelParameters {
    pub fn with_pv(mut self, pv: PvArray) -> Self {
        self.pv = pv;
        self
    }

    pub fn with_carbon_intensity(mut self, g_per_kwh: f64) -> Self {
        self.grid_carbon_intensity_g_per_kwh = g_per_kwh;
        self
    }

    pub fn with_water_intensity(mut self, l_per_kwh: f64) -> Self {
        self.water_intensity_l_per_kwh = l_per_kwh;
        self
    }

    pub fn with_fixed_step(mut self, seconds: f64) -> Self {
        self.fixed_step_seconds = Some(seconds);
        self
    }

    /// Validate all values before an accountant is built from them
    pub fn validate(&self) -> Result<(), ModelError> {
        self.pv.validate()?;

        non_negative(
            "grid_carbon_intensity_g_per_kwh",
            self.grid_carbon_intensity_g_per_kwh,
        )?;
        non_negative("water_intensity_l_per_kwh", self.water_intensity_l_per_kwh)?;

        let k = &self.derating;
        non_negative("derating.rain_factor", k.rain_factor)?;
        non_negative("derating.temperature_loss_per_c", k.temperature_loss_per_c)?;
        non_negative("derating.wind_cooling_per_kmh", k.wind_cooling_per_kmh)?;
        if !k.reference_temperature_c.is_finite() {
            return Err(ModelError::invalid(
                "derating.reference_temperature_c",
                k.reference_temperature_c,
                "must be finite",
            ));
        }

        if let Some(step) = self.fixed_step_seconds {
            if !step.is_finite() || step <= 0.0 {
                return Err(ModelError::invalid(
                    "fixed_step_seconds",
                    step,
                    "must be finite and > 0",
                ));
            }
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ModelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ModelError::invalid(name, value, "must be finite and >= 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ModelParameters::default().validate().is_ok());
    }

    #[test]
    fn test_negative_carbon_intensity_rejected() {
        let params = ModelParameters::default().with_carbon_intensity(-1.0);
        assert!(matches!(
            params.validate(),
            Err(ModelError::InvalidParameter {
                name: "grid_carbon_intensity_g_per_kwh",
                ..
            })
        ));
    }

    #[test]
    fn test_infinite_water_intensity_rejected() {
        let params = ModelParameters::default().with_water_intensity(f64::INFINITY);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_step_rejected() {
        let params = ModelParameters::default().with_fixed_step(0.0);
        assert!(params.validate().is_err());
        assert!(ModelParameters::default().with_fixed_step(3600.0).validate().is_ok());
    }

    #[test]
    fn test_efficiency_out_of_range_rejected() {
        let params = ModelParameters::default().with_pv(PvArray {
            system_efficiency: -0.1,
            ..PvArray::default()
        });
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_deserialize_without_optional_sections() {
        let json = r#"{
            "pv": {"panel_area_m2": 4.0, "module_efficiency": 0.2, "system_efficiency": 0.85},
            "grid_carbon_intensity_g_per_kwh": 400.0,
            "water_intensity_l_per_kwh": 1.8
        }"#;
        let params: ModelParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.derating, DeratingCoefficients::default());
        assert_eq!(params.fixed_step_seconds, None);
    }
}
