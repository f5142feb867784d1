use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{CarbonMass, Energy, WaterVolume};
use crate::policy::Allocation;

/// Cumulative accounting totals
///
/// Every field is a non-decreasing accumulator and
/// `total_energy_kwh == pv_energy_kwh + grid_energy_kwh` up to rounding.
/// Values are only changed by the owning accountant; callers get copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyStatistics {
    /// Workload energy demand (kWh)
    pub total_energy_kwh: f64,
    /// Demand covered by PV (kWh)
    pub pv_energy_kwh: f64,
    /// Demand covered by the grid (kWh)
    pub grid_energy_kwh: f64,
    /// CO2 from grid energy (g)
    pub co2_grams: f64,
    /// Water from grid energy (L)
    pub water_liters: f64,
    /// PV generated but unused (kWh)
    pub pv_surplus_kwh: f64,
    /// Number of intervals accounted
    pub intervals: u64,
    /// Sum of accounted interval lengths (s)
    pub elapsed_seconds: f64,
}

impl EnergyStatistics {
    pub(crate) fn record(
        &mut self,
        elapsed_seconds: f64,
        allocation: &Allocation,
        co2: CarbonMass,
        water: WaterVolume,
    ) {
        self.total_energy_kwh += allocation.demand().as_kilowatt_hours();
        self.pv_energy_kwh += allocation.pv_used.as_kilowatt_hours();
        self.grid_energy_kwh += allocation.grid_used.as_kilowatt_hours();
        self.pv_surplus_kwh += allocation.pv_surplus.as_kilowatt_hours();
        self.co2_grams += co2.as_grams();
        self.water_liters += water.as_liters();
        self.intervals += 1;
        self.elapsed_seconds += elapsed_seconds;
    }

    pub fn total_energy(&self) -> Energy {
        Energy::kilowatt_hours(self.total_energy_kwh)
    }

    pub fn pv_energy(&self) -> Energy {
        Energy::kilowatt_hours(self.pv_energy_kwh)
    }

    pub fn grid_energy(&self) -> Energy {
        Energy::kilowatt_hours(self.grid_energy_kwh)
    }

    pub fn co2(&self) -> CarbonMass {
        CarbonMass::grams(self.co2_grams)
    }

    pub fn water(&self) -> WaterVolume {
        WaterVolume::liters(self.water_liters)
    }

    /// Share of demand met by PV (0-1), zero before any energy was accounted
    pub fn self_sufficiency_ratio(&self) -> f64 {
        if self.total_energy_kwh <= 0.0 {
            return 0.0;
        }
        (self.pv_energy_kwh / self.total_energy_kwh).clamp(0.0, 1.0)
    }

    /// Check `total == pv + grid` within `tolerance` kWh
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        (self.total_energy_kwh - (self.pv_energy_kwh + self.grid_energy_kwh)).abs() <= tolerance
    }
}

impl fmt::Display for EnergyStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EnergyStatistics {{ Total: {:.4}kWh, PV: {:.4}kWh, Grid: {:.4}kWh, CO2: {:.2}g, Water: {:.3}L, Intervals: {} }}",
            self.total_energy_kwh,
            self.pv_energy_kwh,
            self.grid_energy_kwh,
            self.co2_grams,
            self.water_liters,
            self.intervals
        )
    }
}
