use serde::{Deserialize, Serialize};

use super::{Allocation, AllocationPolicy};
use crate::domain::Energy;

/// PV-first allocation
///
/// Available PV energy covers demand first; the grid supplies the remainder.
/// Surplus PV in an interval is discarded, never banked for a later interval.
/// At exact equality the PV branch is taken, so the grid share is exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvFirstPolicy;

impl AllocationPolicy for PvFirstPolicy {
    fn allocate(&self, pv_available: Energy, demand: Energy) -> Allocation {
        if pv_available >= demand {
            Allocation {
                pv_used: demand,
                grid_used: Energy::ZERO,
                pv_surplus: pv_available - demand,
            }
        } else {
            Allocation {
                pv_used: pv_available,
                grid_used: demand - pv_available,
                pv_surplus: Energy::ZERO,
            }
        }
    }

    fn name(&self) -> &'static str {
        "pv-first"
    }
}
