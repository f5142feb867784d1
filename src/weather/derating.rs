//! # Weather Derating
//!
//! Maps a weather observation to four independent multiplicative factors.
//! Clouds and rain attenuate irradiance; temperature and wind adjust module
//! conversion efficiency. A missing observation field leaves its factor at 1.0.
//!
//! The rain factor is a step (any rain gives 0.3) and the wind bonus is
//! uncapped. Both are coarse by construction and exposed as tunables in
//! [`DeratingCoefficients`].

use serde::{Deserialize, Serialize};

use crate::domain::Irradiance;

/// Raw weather readings. `None` means the reading was unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub cloud_cover_percent: Option<f64>,
    pub rain_mm: Option<f64>,
    pub temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
}

impl WeatherObservation {
    /// Observation that produces no derating at all
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// First non-finite reading, if any
    pub(crate) fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        [
            ("cloud_cover_percent", self.cloud_cover_percent),
            ("rain_mm", self.rain_mm),
            ("temperature_c", self.temperature_c),
            ("wind_speed_kmh", self.wind_speed_kmh),
        ]
        .into_iter()
        .find_map(|(name, v)| v.filter(|x| !x.is_finite()).map(|x| (name, x)))
    }
}

/// Coefficients of the derating formulas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeratingCoefficients {
    /// Irradiance factor applied whenever any rain is reported
    pub rain_factor: f64,
    /// Module reference temperature (°C)
    pub reference_temperature_c: f64,
    /// Efficiency loss per °C above the reference
    pub temperature_loss_per_c: f64,
    /// Efficiency gain per km/h of wind
    pub wind_cooling_per_kmh: f64,
}

impl Default for DeratingCoefficients {
    fn default() -> Self {
        Self {
            rain_factor: 0.3,
            reference_temperature_c: 25.0,
            temperature_loss_per_c: 0.004,
            wind_cooling_per_kmh: 0.001,
        }
    }
}

/// Multiplicative factors derived from one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeratingFactors {
    pub cloud: f64,
    pub rain: f64,
    pub temperature: f64,
    pub wind_cooling: f64,
}

impl Default for DeratingFactors {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl DeratingFactors {
    pub const NEUTRAL: Self = Self {
        cloud: 1.0,
        rain: 1.0,
        temperature: 1.0,
        wind_cooling: 1.0,
    };

    /// Compute factors with the default coefficients
    pub fn from_observation(obs: &WeatherObservation) -> Self {
        Self::with_coefficients(obs, &DeratingCoefficients::default())
    }

    pub fn with_coefficients(obs: &WeatherObservation, k: &DeratingCoefficients) -> Self {
        let cloud = obs
            .cloud_cover_percent
            .map(|pct| (1.0 - pct / 100.0).clamp(0.0, 1.0))
            .unwrap_or(1.0);

        let rain = match obs.rain_mm {
            Some(mm) if mm > 0.0 => k.rain_factor,
            _ => 1.0,
        };

        // No credit below the reference temperature
        let temperature = obs
            .temperature_c
            .map(|t| 1.0 - (t - k.reference_temperature_c).max(0.0) * k.temperature_loss_per_c)
            .unwrap_or(1.0);

        let wind_cooling = obs
            .wind_speed_kmh
            .map(|w| 1.0 + w * k.wind_cooling_per_kmh)
            .unwrap_or(1.0);

        Self {
            cloud,
            rain,
            temperature,
            wind_cooling,
        }
    }

    /// Factor applied to raw irradiance
    pub fn irradiance_factor(&self) -> f64 {
        self.cloud * self.rain
    }

    /// Factor folded into the module × system efficiency product
    pub fn efficiency_factor(&self) -> f64 {
        self.temperature * self.wind_cooling
    }

    pub fn apply_to(&self, raw: Irradiance) -> Irradiance {
        raw.scaled(self.irradiance_factor())
    }
}
