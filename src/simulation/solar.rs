//! # Clear-Sky Irradiance
//!
//! Theoretical irradiance from solar geometry alone:
//!
//! ```text
//! δ  = 23.45° · sin(360/365 · (284 + n))
//! ω  = 15° · (hour − 12)
//! sin α = sin φ · sin δ + cos φ · cos δ · cos ω
//! G  = G_max · sin α        (0 when the sun is below the horizon)
//! ```
//!
//! `hour` is local clock time used directly as solar time; there is no
//! longitude or equation-of-time correction and no atmospheric attenuation.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::Irradiance;

/// Peak irradiance with the sun at zenith (W/m²)
pub const PEAK_IRRADIANCE_W_M2: f64 = 1000.0;

/// Clear-sky irradiance model for a fixed latitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearSkyModel {
    latitude_deg: f64,
    peak_w_m2: f64,
}

impl ClearSkyModel {
    pub fn new(latitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            peak_w_m2: PEAK_IRRADIANCE_W_M2,
        }
    }

    pub fn with_peak(mut self, peak_w_m2: f64) -> Self {
        self.peak_w_m2 = peak_w_m2;
        self
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    /// Solar declination in degrees for day-of-year `n` (1-366)
    pub fn declination_deg(day_of_year: u32) -> f64 {
        23.45 * (360.0 / 365.0 * (284.0 + day_of_year as f64)).to_radians().sin()
    }

    /// Sine of the solar elevation angle
    pub fn sin_elevation(&self, day_of_year: u32, hour: f64) -> f64 {
        let lat = self.latitude_deg.to_radians();
        let dec = Self::declination_deg(day_of_year).to_radians();
        let hour_angle = ((hour - 12.0) * 15.0).to_radians();

        lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos()
    }

    /// Clear-sky irradiance for a day-of-year and local decimal hour
    pub fn irradiance(&self, day_of_year: u32, hour: f64) -> Irradiance {
        let sin_alpha = self.sin_elevation(day_of_year, hour);
        if sin_alpha < 0.0 {
            return Irradiance::ZERO;
        }
        Irradiance::watts_per_m2(self.peak_w_m2 * sin_alpha)
    }

    /// Clear-sky irradiance at a local timestamp
    pub fn irradiance_at(&self, time: NaiveDateTime) -> Irradiance {
        self.irradiance(time.ordinal(), decimal_hour(time))
    }
}

/// Hour of day including minutes, e.g. 13:30 -> 13.5
pub fn decimal_hour(time: NaiveDateTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

/// Clear-sky irradiance as a free function of latitude, day-of-year and hour
pub fn clear_sky_irradiance(latitude_deg: f64, day_of_year: u32, hour: f64) -> Irradiance {
    ClearSkyModel::new(latitude_deg).irradiance(day_of_year, hour)
}
