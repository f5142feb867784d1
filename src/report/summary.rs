use std::fmt;

use crate::accountant::{EnergyStatistics, IntervalRecord};

/// Console rendering of one accounted interval and the totals after it
#[derive(Debug, Clone, Copy)]
pub struct IntervalSummary<'a> {
    pub record: &'a IntervalRecord,
    pub totals: &'a EnergyStatistics,
}

impl<'a> IntervalSummary<'a> {
    pub fn new(record: &'a IntervalRecord, totals: &'a EnergyStatistics) -> Self {
        Self { record, totals }
    }
}

impl fmt::Display for IntervalSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.record;
        writeln!(f, "Weather impact:")?;
        writeln!(f, "  cloud factor        {:.3}", r.factors.cloud)?;
        writeln!(f, "  rain factor         {:.3}", r.factors.rain)?;
        writeln!(f, "  temperature factor  {:.3}", r.factors.temperature)?;
        writeln!(f, "  wind cooling factor {:.3}", r.factors.wind_cooling)?;
        writeln!(f, "Clear-sky irradiance: {}", r.raw_irradiance)?;
        writeln!(f, "Adjusted irradiance:  {}", r.effective_irradiance)?;
        writeln!(f, "Estimated PV power:   {}", r.pv_power)?;
        writeln!(f)?;
        write!(f, "{}", TotalsSummary(self.totals))
    }
}

/// Console rendering of cumulative totals
#[derive(Debug, Clone, Copy)]
pub struct TotalsSummary<'a>(pub &'a EnergyStatistics);

impl fmt::Display for TotalsSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "===== RESULT =====")?;
        writeln!(f, "Total energy: {}", s.total_energy())?;
        writeln!(f, "PV energy:    {}", s.pv_energy())?;
        writeln!(f, "Grid energy:  {}", s.grid_energy())?;
        writeln!(f, "CO2:          {}", s.co2())?;
        writeln!(f, "Water:        {}", s.water())?;
        write!(
            f,
            "Self-sufficiency: {:.1}%",
            s.self_sufficiency_ratio() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accountant::{EnergyAccountant, IntervalInputs, ModelParameters};
    use crate::domain::{Irradiance, Power};

    #[test]
    fn test_interval_summary_lists_factors_and_totals() {
        let mut acc = EnergyAccountant::new(ModelParameters::default()).unwrap();
        let record = acc
            .update(&IntervalInputs::new(3600.0, Irradiance::watts_per_m2(800.0), Power::kilowatts(2.0)))
            .unwrap()
            .unwrap();
        let totals = acc.statistics();

        let text = IntervalSummary::new(&record, &totals).to_string();
        assert!(text.contains("cloud factor        1.000"));
        assert!(text.contains("Estimated PV power:   1.30 kW"));
        assert!(text.contains("Total energy: 2.000 kWh"));
        assert!(text.contains("Grid energy:  704.0 Wh"));
        assert!(text.contains("Self-sufficiency: 64.8%"));
    }

    #[test]
    fn test_totals_summary_empty() {
        let text = TotalsSummary(&EnergyStatistics::default()).to_string();
        assert!(text.contains("CO2:          0.0 gCO2"));
        assert!(text.ends_with("Self-sufficiency: 0.0%"));
    }
}
