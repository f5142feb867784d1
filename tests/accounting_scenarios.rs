//! End-to-end accounting scenarios and accumulator properties.

use approx::assert_relative_eq;
use proptest::prelude::*;
use pvfirst_accountant::accountant::{EnergyAccountant, IntervalInputs, ModelParameters, Readings};
use pvfirst_accountant::domain::{Irradiance, Power};
use pvfirst_accountant::energy::PvArray;
use pvfirst_accountant::simulation::{ManualClock, SimulationClock};
use pvfirst_accountant::weather::WeatherObservation;

/// 1 W/m² of irradiance produces exactly 1 W
fn unit_params() -> ModelParameters {
    ModelParameters::default().with_pv(PvArray {
        panel_area_m2: 1.0,
        module_efficiency: 1.0,
        system_efficiency: 1.0,
    })
}

fn interval(elapsed: f64, pv_w: f64, job_w: f64) -> IntervalInputs {
    IntervalInputs::new(elapsed, Irradiance::watts_per_m2(pv_w), Power::watts(job_w))
}

#[test]
fn one_hour_half_covered_by_pv() {
    let mut acc = EnergyAccountant::new(unit_params().with_carbon_intensity(100.0)).unwrap();
    acc.update(&interval(3600.0, 1000.0, 2000.0)).unwrap();

    let s = acc.statistics();
    assert_relative_eq!(s.total_energy_kwh, 2.0, epsilon = 1e-12);
    assert_relative_eq!(s.pv_energy_kwh, 1.0, epsilon = 1e-12);
    assert_relative_eq!(s.grid_energy_kwh, 1.0, epsilon = 1e-12);
    assert_relative_eq!(s.co2_grams, 100.0, epsilon = 1e-9);
}

#[test]
fn pv_exactly_matching_demand_uses_no_grid() {
    let mut acc = EnergyAccountant::new(unit_params()).unwrap();
    let record = acc.update(&interval(1800.0, 2000.0, 2000.0)).unwrap().unwrap();

    assert_eq!(record.allocation.grid_used.as_kilowatt_hours(), 0.0);
    assert_eq!(record.allocation.pv_surplus.as_kilowatt_hours(), 0.0);
    assert_eq!(acc.statistics().co2_grams, 0.0);
}

#[test]
fn night_interval_is_all_grid() {
    let mut acc = EnergyAccountant::new(unit_params().with_water_intensity(2.0)).unwrap();
    acc.update(&interval(3600.0, 0.0, 500.0)).unwrap();

    let s = acc.statistics();
    assert_eq!(s.pv_energy_kwh, 0.0);
    assert_relative_eq!(s.grid_energy_kwh, 0.5, epsilon = 1e-12);
    assert_relative_eq!(s.water_liters, 1.0, epsilon = 1e-12);
}

#[test]
fn overcast_rainy_hot_day_derates_generation() {
    let mut acc = EnergyAccountant::new(ModelParameters::default()).unwrap();
    let weather = WeatherObservation {
        cloud_cover_percent: Some(100.0),
        rain_mm: Some(2.0),
        temperature_c: Some(40.0),
        wind_speed_kmh: Some(0.0),
    };
    let record = acc
        .update(&interval(3600.0, 900.0, 1000.0).with_weather(weather))
        .unwrap()
        .unwrap();

    assert_eq!(record.effective_irradiance, Irradiance::ZERO);
    assert_eq!(record.pv_power, Power::ZERO);
    assert_relative_eq!(record.factors.rain, 0.3);
    assert_relative_eq!(record.factors.temperature, 0.94, epsilon = 1e-12);
    assert_relative_eq!(acc.statistics().grid_energy_kwh, 1.0, epsilon = 1e-12);
}

#[test]
fn clock_and_explicit_modes_agree() {
    let samples = [(60.0, 0.0), (60.0, 1500.0), (120.0, 800.0), (30.0, 2500.0)];

    let mut explicit = EnergyAccountant::new(unit_params()).unwrap();
    let mut clock = ManualClock::new();
    let mut driven = EnergyAccountant::with_clock(unit_params(), &clock).unwrap();

    for (dt, pv) in samples {
        explicit.update(&interval(dt, pv, 1000.0)).unwrap();

        clock.advance(dt);
        driven
            .sync_with_clock(&clock, Readings::new(Irradiance::watts_per_m2(pv), Power::watts(1000.0)))
            .unwrap();
    }

    assert_eq!(explicit.statistics(), driven.statistics());
    assert_eq!(driven.last_update_seconds(), Some(clock.now_seconds()));
}

#[test]
fn fixed_step_matches_explicit_step() {
    let mut fixed = EnergyAccountant::new(unit_params().with_fixed_step(900.0)).unwrap();
    let mut explicit = EnergyAccountant::new(unit_params()).unwrap();

    for pv in [0.0, 400.0, 1200.0] {
        fixed
            .advance(Readings::new(Irradiance::watts_per_m2(pv), Power::watts(700.0)))
            .unwrap();
        explicit.update(&interval(900.0, pv, 700.0)).unwrap();
    }

    assert_eq!(fixed.statistics(), explicit.statistics());
}

fn arb_interval() -> impl Strategy<Value = (f64, f64, f64)> {
    (-600.0..7200.0f64, 0.0..1200.0f64, 0.0..5000.0f64)
}

proptest! {
    #[test]
    fn accumulators_never_decrease(steps in prop::collection::vec(arb_interval(), 1..40)) {
        let mut acc = EnergyAccountant::new(ModelParameters::default()).unwrap();
        let mut prev = acc.statistics();

        for (dt, g, p) in steps {
            acc.update(&interval(dt, g, p)).unwrap();
            let now = acc.statistics();
            prop_assert!(now.total_energy_kwh >= prev.total_energy_kwh);
            prop_assert!(now.pv_energy_kwh >= prev.pv_energy_kwh);
            prop_assert!(now.grid_energy_kwh >= prev.grid_energy_kwh);
            prop_assert!(now.co2_grams >= prev.co2_grams);
            prop_assert!(now.water_liters >= prev.water_liters);
            prev = now;
        }
    }

    #[test]
    fn totals_balance(steps in prop::collection::vec(arb_interval(), 1..40)) {
        let mut acc = EnergyAccountant::new(ModelParameters::default()).unwrap();
        for (dt, g, p) in steps {
            acc.update(&interval(dt, g, p)).unwrap();
        }
        let s = acc.statistics();
        prop_assert!(s.is_balanced(1e-9 * s.total_energy_kwh.max(1.0)));
        prop_assert!(s.pv_energy_kwh <= s.total_energy_kwh + 1e-12);
    }

    #[test]
    fn emissions_follow_grid_energy(
        steps in prop::collection::vec(arb_interval(), 1..20),
        ci in 0.0..900.0f64,
        wi in 0.0..5.0f64,
    ) {
        let params = ModelParameters::default()
            .with_carbon_intensity(ci)
            .with_water_intensity(wi);
        let mut acc = EnergyAccountant::new(params).unwrap();
        for (dt, g, p) in steps {
            acc.update(&interval(dt, g, p)).unwrap();
        }
        let s = acc.statistics();
        prop_assert!((s.co2_grams - s.grid_energy_kwh * ci).abs() <= 1e-6 * s.co2_grams.max(1.0));
        prop_assert!((s.water_liters - s.grid_energy_kwh * wi).abs() <= 1e-6 * s.water_liters.max(1.0));
    }

    #[test]
    fn non_advancing_update_changes_nothing(dt in -1e6..=0.0f64, g in 0.0..1200.0f64, p in 0.0..5000.0f64) {
        let mut acc = EnergyAccountant::new(ModelParameters::default()).unwrap();
        acc.update(&interval(600.0, 500.0, 2000.0)).unwrap();
        let before = acc.statistics();

        prop_assert_eq!(acc.update(&interval(dt, g, p)).unwrap(), None);
        prop_assert_eq!(acc.statistics(), before);
    }
}
