use chrono::{Datelike, Duration, NaiveDateTime};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tracing::debug;

use crate::accountant::{EnergyStatistics, IntervalRecord};
use crate::error::ReportError;
use crate::simulation::ProfileRun;

/// Field separator for the persisted CSV
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Delimiter {
    #[default]
    Semicolon,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Semicolon => b';',
            Delimiter::Comma => b',',
        }
    }
}

/// One persisted line: the interval's instantaneous values plus the
/// cumulative totals after it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRow {
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`
    pub local_time: String,
    pub day_of_year: u32,
    /// W/m², after cloud and rain attenuation
    pub adjusted_irradiance: f64,
    /// °C, empty when unknown
    pub temperature: Option<f64>,
    /// W
    pub instantaneous_pv_power: f64,
    /// kWh
    pub cumulative_total_energy: f64,
    /// kWh
    pub cumulative_pv_energy: f64,
    /// kWh
    pub cumulative_grid_energy: f64,
    /// gCO2
    #[serde(rename = "cumulativeCO2")]
    pub cumulative_co2: f64,
}

impl CsvRow {
    pub fn new(local_time: NaiveDateTime, record: &IntervalRecord, totals: &EnergyStatistics) -> Self {
        Self {
            local_time: local_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            day_of_year: local_time.ordinal(),
            adjusted_irradiance: record.effective_irradiance.as_watts_per_m2(),
            temperature: record.temperature_c,
            instantaneous_pv_power: record.pv_power.as_watts(),
            cumulative_total_energy: totals.total_energy_kwh,
            cumulative_pv_energy: totals.pv_energy_kwh,
            cumulative_grid_energy: totals.grid_energy_kwh,
            cumulative_co2: totals.co2_grams,
        }
    }
}

/// Rows for every accounted step of a replay started at `start`
///
/// Each row is labelled with the time its irradiance was sampled, so the
/// timestamp and the adjusted irradiance in a row always agree. Steps where
/// the clock did not advance are skipped.
pub fn profile_rows(start: NaiveDateTime, run: &ProfileRun) -> Vec<CsvRow> {
    run.steps
        .iter()
        .filter_map(|step| {
            let record = step.record.as_ref()?;
            let time = start + Duration::milliseconds((step.sampled_at_seconds * 1000.0).round() as i64);
            Some(CsvRow::new(time, record, &step.totals))
        })
        .collect()
}

/// Append-only CSV log of accounted intervals
#[derive(Debug, Clone)]
pub struct CsvReport {
    path: PathBuf,
    delimiter: Delimiter,
}

impl CsvReport {
    pub fn new(path: impl Into<PathBuf>, delimiter: Delimiter) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new or empty
    pub fn append(&self, row: &CsvRow) -> Result<(), ReportError> {
        self.append_all(std::slice::from_ref(row))
    }

    pub fn append_all(&self, rows: &[CsvRow]) -> Result<(), ReportError> {
        let io_err = |source| ReportError::Io {
            path: self.path.display().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        let write_header = file.metadata().map_err(io_err)?.len() == 0;

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter.as_byte())
            .has_headers(write_header)
            .from_writer(file);

        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(io_err)?;

        debug!(
            path = %self.path.display(),
            rows = rows.len(),
            header = write_header,
            "appended interval rows"
        );
        Ok(())
    }
}
