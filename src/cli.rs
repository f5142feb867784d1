//! Command-line model and duration parsing.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum::EnumString;
use tracing::warn;

use crate::error::DurationError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Extra TOML file layered over `config/default.toml`
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Account one live interval at the current location and time
    Run(RunArgs),
    /// Replay a simulated irradiance profile
    Profile(ProfileArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Interval length, e.g. 10S, 5M, 2H (bare numbers are seconds).
    /// Defaults to the configured accounting step.
    #[arg(long, short, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Skip geolocation and weather lookups
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Append the interval to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Fixed 7-sample profile, one minute apart, 200 W host
    Synthetic,
    /// 24 hours of clear-sky irradiance at the configured site
    ClearSky,
}

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(long, value_enum, default_value_t = ProfileKind::Synthetic)]
    pub kind: ProfileKind,

    /// Day to simulate for the clear-sky profile (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Clear-sky sampling step in minutes
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(i64).range(1..=1440))]
    pub step_minutes: i64,

    /// Print every step, not only the totals
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum TimeUnit {
    S,
    M,
    H,
}

impl TimeUnit {
    fn seconds(self) -> f64 {
        match self {
            TimeUnit::S => 1.0,
            TimeUnit::M => 60.0,
            TimeUnit::H => 3600.0,
        }
    }
}

/// Parse `10S`, `5M`, `2H` or a bare number of seconds
///
/// An unknown unit suffix is treated as seconds with a warning.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationError::Empty);
    }

    let split = input
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| DurationError::Invalid(input.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(DurationError::Invalid(input.to_string()));
    }

    let multiplier = if unit.is_empty() {
        1.0
    } else {
        match TimeUnit::from_str(unit) {
            Ok(unit) => unit.seconds(),
            Err(_) => {
                warn!(unit, "unknown duration unit, using seconds");
                1.0
            }
        }
    };

    Duration::try_from_secs_f64(value * multiplier).map_err(|_| DurationError::Invalid(input.to_string()))
}
