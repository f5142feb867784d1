use serde::{Deserialize, Serialize};

use crate::domain::{CarbonMass, Energy};

/// Grid carbon intensity (gCO2/kWh) applied to grid-supplied energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonModel {
    pub intensity_g_per_kwh: f64,
}

impl CarbonModel {
    pub fn new(intensity_g_per_kwh: f64) -> Self {
        Self {
            intensity_g_per_kwh,
        }
    }

    pub fn emissions(&self, grid_energy: Energy) -> CarbonMass {
        CarbonMass::grams(grid_energy.as_kilowatt_hours() * self.intensity_g_per_kwh)
    }
}
