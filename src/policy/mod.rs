//! Interval allocation policies
//!
//! A policy decides, for a single interval, how a workload's demand energy is
//! split between on-site PV and the grid. Policies are stateless and myopic:
//! no storage and no look-ahead across intervals.

pub mod pv_first;

pub use pv_first::PvFirstPolicy;

use serde::{Deserialize, Serialize};

use crate::domain::Energy;

/// Result of allocating one interval's demand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Demand covered by PV (kWh)
    pub pv_used: Energy,
    /// Demand covered by the grid (kWh)
    pub grid_used: Energy,
    /// PV available but not consumed this interval (kWh, discarded)
    pub pv_surplus: Energy,
}

impl Allocation {
    /// `pv_used + grid_used`, equal to the demand that was allocated
    pub fn demand(&self) -> Energy {
        self.pv_used + self.grid_used
    }
}

pub trait AllocationPolicy: Send + Sync {
    /// Split `demand` between PV and grid given `pv_available` for the same interval
    fn allocate(&self, pv_available: Energy, demand: Energy) -> Allocation;

    fn name(&self) -> &'static str;
}
