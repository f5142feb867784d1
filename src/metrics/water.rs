use serde::{Deserialize, Serialize};

use crate::domain::{Energy, WaterVolume};

/// Indirect water use of grid electricity (L/kWh)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterFootprintModel {
    pub intensity_l_per_kwh: f64,
}

impl WaterFootprintModel {
    pub fn new(intensity_l_per_kwh: f64) -> Self {
        Self {
            intensity_l_per_kwh,
        }
    }

    pub fn water_use(&self, grid_energy: Energy) -> WaterVolume {
        WaterVolume::liters(grid_energy.as_kilowatt_hours() * self.intensity_l_per_kwh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_for_one_kwh() {
        let model = WaterFootprintModel::new(2.0);
        assert_eq!(model.water_use(Energy::kilowatt_hours(1.0)).as_liters(), 2.0);
    }
}
