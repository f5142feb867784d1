//! Workload (compute host or job) power draw.

use serde::{Deserialize, Serialize};

use crate::domain::{Energy, Power};

/// Demand energy of a workload drawing `power` for an interval.
///
/// The conversion law is the same as for PV generation; the model is kept
/// separate because the draw comes from the host, not from irradiance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadPowerModel;

impl WorkloadPowerModel {
    pub fn energy(&self, power: Power, elapsed_seconds: f64) -> Energy {
        power.energy_over(elapsed_seconds)
    }
}
