//! # Offline Profile Drivers
//!
//! Replays irradiance sequences through a clock-driven accountant without
//! touching the network. Two sources are provided:
//!
//! - a fixed synthetic morning-to-evening profile sampled once a minute
//! - a clear-sky day computed from solar geometry at a given latitude
//!
//! Each sample advances a [`ManualClock`] by one step and then notifies the
//! accountant, so the reading applies to the interval that just ended.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use super::{ClearSkyModel, ManualClock, SimulationClock};
use crate::accountant::{EnergyAccountant, EnergyStatistics, IntervalRecord, ModelParameters, Readings};
use crate::domain::{Irradiance, Power};
use crate::error::AccountingError;
use crate::weather::WeatherObservation;

/// Synthetic day-like irradiance profile (W/m²)
pub const SYNTHETIC_PROFILE_W_M2: [f64; 7] = [0.0, 200.0, 500.0, 800.0, 600.0, 300.0, 0.0];

/// Step between synthetic profile samples (s)
pub const SYNTHETIC_STEP_SECONDS: f64 = 60.0;

/// Average host power used with the synthetic profile (W)
pub const SYNTHETIC_HOST_POWER_W: f64 = 200.0;

/// One replayed sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileStep {
    /// Simulated time the irradiance was sampled at, the interval start (s)
    pub sampled_at_seconds: f64,
    /// Simulated time at which the sample was applied, the interval end (s)
    pub time_seconds: f64,
    pub irradiance: Irradiance,
    /// `None` when the clock did not advance for this sample
    pub record: Option<IntervalRecord>,
    /// Cumulative totals after the sample
    pub totals: EnergyStatistics,
}

/// Outcome of a full replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRun {
    pub steps: Vec<ProfileStep>,
    pub totals: EnergyStatistics,
}

/// Replays an irradiance sequence at a constant workload power
#[derive(Debug, Clone)]
pub struct ProfileRunner {
    accountant: EnergyAccountant,
    clock: ManualClock,
    step_seconds: f64,
    workload_power: Power,
    weather: Option<WeatherObservation>,
}

impl ProfileRunner {
    pub fn new(params: ModelParameters, step_seconds: f64, workload_power: Power) -> Result<Self, AccountingError> {
        if !step_seconds.is_finite() || step_seconds <= 0.0 {
            return Err(AccountingError::invalid("step_seconds", step_seconds, "must be finite and > 0"));
        }

        let clock = ManualClock::new();
        let accountant = EnergyAccountant::with_clock(params, &clock)?;
        Ok(Self {
            accountant,
            clock,
            step_seconds,
            workload_power,
            weather: None,
        })
    }

    /// Runner preset for [`SYNTHETIC_PROFILE_W_M2`]
    pub fn synthetic(params: ModelParameters) -> Result<Self, AccountingError> {
        Self::new(params, SYNTHETIC_STEP_SECONDS, Power::watts(SYNTHETIC_HOST_POWER_W))
    }

    /// Apply the same weather observation to every sample
    pub fn with_weather(mut self, weather: WeatherObservation) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn step_seconds(&self) -> f64 {
        self.step_seconds
    }

    pub fn accountant(&self) -> &EnergyAccountant {
        &self.accountant
    }

    /// Advance the clock one step and account `irradiance` over it
    pub fn step(&mut self, irradiance: Irradiance) -> Result<ProfileStep, AccountingError> {
        let sampled_at_seconds = self.clock.now_seconds();
        self.clock.advance(self.step_seconds);

        let mut readings = Readings::new(irradiance, self.workload_power);
        if let Some(weather) = self.weather {
            readings = readings.with_weather(weather);
        }
        let record = self.accountant.sync_with_clock(&self.clock, readings)?;

        Ok(ProfileStep {
            sampled_at_seconds,
            time_seconds: self.clock.now_seconds(),
            irradiance,
            record,
            totals: self.accountant.statistics(),
        })
    }

    /// Replay a whole sequence
    pub fn run<I>(mut self, profile: I) -> Result<ProfileRun, AccountingError>
    where
        I: IntoIterator<Item = Irradiance>,
    {
        let steps = profile
            .into_iter()
            .map(|g| self.step(g))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProfileRun {
            steps,
            totals: self.accountant.statistics(),
        })
    }
}

/// Replay [`SYNTHETIC_PROFILE_W_M2`] with the preset step and host power
pub fn run_synthetic_profile(params: ModelParameters) -> Result<ProfileRun, AccountingError> {
    ProfileRunner::synthetic(params)?.run(SYNTHETIC_PROFILE_W_M2.map(Irradiance::watts_per_m2))
}

/// Clear-sky irradiance sampled every `step_minutes` over 24 hours from `start`
pub fn clear_sky_day(model: &ClearSkyModel, start: NaiveDateTime, step_minutes: i64) -> Vec<(NaiveDateTime, Irradiance)> {
    let mut samples = Vec::new();
    if step_minutes <= 0 {
        return samples;
    }

    let end = start + Duration::days(1);
    let mut time = start;
    while time < end {
        samples.push((time, model.irradiance_at(time)));
        time += Duration::minutes(step_minutes);
    }
    samples
}

/// Account a full clear-sky day at constant workload power
pub fn simulate_clear_sky_day(
    params: ModelParameters,
    latitude_deg: f64,
    start: NaiveDateTime,
    step_minutes: i64,
    workload_power: Power,
) -> Result<ProfileRun, AccountingError> {
    let samples = clear_sky_day(&ClearSkyModel::new(latitude_deg), start, step_minutes);
    ProfileRunner::new(params, step_minutes as f64 * 60.0, workload_power)?
        .run(samples.into_iter().map(|(_, g)| g))
}
