use serde::{Deserialize, Serialize};

use crate::domain::{CarbonMass, Energy, Irradiance, Power, WaterVolume};
use crate::error::AccountingError;
use crate::policy::Allocation;
use crate::weather::{DeratingFactors, WeatherObservation};

/// Instantaneous readings supplied by the driver for one interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    /// Raw (underated) irradiance
    pub irradiance: Irradiance,
    /// Workload power draw
    pub workload_power: Power,
    /// Weather at the site, if known
    pub weather: Option<WeatherObservation>,
}

impl Readings {
    pub fn new(irradiance: Irradiance, workload_power: Power) -> Self {
        Self {
            irradiance,
            workload_power,
            weather: None,
        }
    }

    pub fn with_weather(mut self, weather: WeatherObservation) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Attach an interval length
    pub fn over(self, elapsed_seconds: f64) -> IntervalInputs {
        IntervalInputs {
            elapsed_seconds,
            irradiance: self.irradiance,
            workload_power: self.workload_power,
            weather: self.weather,
        }
    }
}

/// One interval's worth of input, consumed by a single update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalInputs {
    /// Interval length (s); `<= 0` makes the update a no-op
    pub elapsed_seconds: f64,
    pub irradiance: Irradiance,
    pub workload_power: Power,
    pub weather: Option<WeatherObservation>,
}

impl IntervalInputs {
    pub fn new(elapsed_seconds: f64, irradiance: Irradiance, workload_power: Power) -> Self {
        Readings::new(irradiance, workload_power).over(elapsed_seconds)
    }

    pub fn with_weather(mut self, weather: WeatherObservation) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Reject readings that would break the non-decreasing accumulators
    pub fn validate(&self) -> Result<(), AccountingError> {
        if !self.elapsed_seconds.is_finite() {
            return Err(AccountingError::invalid(
                "elapsed_seconds",
                self.elapsed_seconds,
                "must be finite",
            ));
        }

        let irradiance = self.irradiance.as_watts_per_m2();
        if !irradiance.is_finite() || irradiance < 0.0 {
            return Err(AccountingError::invalid(
                "irradiance",
                irradiance,
                "must be finite and >= 0",
            ));
        }

        let power = self.workload_power.as_watts();
        if !power.is_finite() || power < 0.0 {
            return Err(AccountingError::invalid(
                "workload_power",
                power,
                "must be finite and >= 0",
            ));
        }

        if let Some((field, value)) = self.weather.as_ref().and_then(|w| w.first_non_finite()) {
            return Err(AccountingError::invalid(field, value, "must be finite"));
        }

        Ok(())
    }
}

/// What one accounting transition did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub elapsed_seconds: f64,
    pub raw_irradiance: Irradiance,
    /// Irradiance after cloud and rain attenuation
    pub effective_irradiance: Irradiance,
    pub factors: DeratingFactors,
    /// Ambient temperature, when reported
    pub temperature_c: Option<f64>,
    /// Instantaneous PV power after all derating
    pub pv_power: Power,
    /// PV energy available over the interval
    pub pv_energy: Energy,
    /// Workload demand over the interval
    pub demand: Energy,
    pub allocation: Allocation,
    pub co2: CarbonMass,
    pub water: WaterVolume,
}
