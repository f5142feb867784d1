//! # Energy Accounting Core
//!
//! Ties the PV, workload, allocation and environmental models together and
//! accumulates their results interval by interval. Two configuration modes
//! share one implementation: fixed-step (a configured interval length) and
//! clock-driven (elapsed time read from a simulation clock). Plain explicit
//! elapsed time is always available through `update`.

pub mod inputs;
pub mod model;
pub mod params;
pub mod statistics;

pub use inputs::{IntervalInputs, IntervalRecord, Readings};
pub use model::{EnergyAccountant, TimeBase};
pub use params::ModelParameters;
pub use statistics::EnergyStatistics;
