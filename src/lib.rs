//! # PV-First Energy Accountant
//!
//! Attributes the energy drawn by a compute workload to on-site photovoltaic
//! generation first and to the grid for the remainder, and derives the CO2
//! and water footprint of the grid share.
//!
//! ```rust
//! use pvfirst_accountant::accountant::{EnergyAccountant, IntervalInputs, ModelParameters};
//! use pvfirst_accountant::domain::{Irradiance, Power};
//!
//! let mut accountant = EnergyAccountant::new(ModelParameters::default()).unwrap();
//! accountant
//!     .update(&IntervalInputs::new(3600.0, Irradiance::watts_per_m2(800.0), Power::kilowatts(2.0)))
//!     .unwrap();
//!
//! let stats = accountant.statistics();
//! assert!((stats.pv_energy_kwh - 1.296).abs() < 1e-9);
//! ```

pub mod accountant;
pub mod cli;
pub mod config;
pub mod domain;
pub mod energy;
pub mod error;
pub mod location;
pub mod metrics;
pub mod policy;
pub mod report;
pub mod simulation;
pub mod telemetry;
pub mod weather;

pub use accountant::{EnergyAccountant, EnergyStatistics, IntervalInputs, ModelParameters, Readings};
pub use error::{AccountingError, ModelError, ProviderError, ReportError};
