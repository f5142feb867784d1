use tracing::{debug, trace};

use super::{EnergyStatistics, IntervalInputs, IntervalRecord, ModelParameters, Readings};
use crate::energy::{PvGenerationModel, WorkloadPowerModel};
use crate::error::{AccountingError, ModelError};
use crate::metrics::{CarbonModel, WaterFootprintModel};
use crate::policy::{AllocationPolicy, PvFirstPolicy};
use crate::simulation::SimulationClock;
use crate::weather::DeratingFactors;

/// How an accountant learns the length of each interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeBase {
    /// Every input carries its own `elapsed_seconds`
    Explicit,
    /// Each `advance` covers a configured step
    FixedStep { step_seconds: f64 },
    /// Elapsed time is derived from an external simulation clock
    Clock { last_update_seconds: f64 },
}

/// Energy Accountant - the stateful core
///
/// Owns the cumulative [`EnergyStatistics`] and, per interval:
/// 1. Derives the interval length (no-op when it is not positive)
/// 2. Derates irradiance and efficiency from the weather observation
/// 3. Computes PV energy and workload demand for the interval
/// 4. Splits demand between PV and grid with the allocation policy
/// 5. Accumulates energy totals
/// 6. Accumulates CO2 and water from the grid share
/// 7. Advances the clock reference (clock-driven mode only)
///
/// Not internally synchronised; wrap it in a lock to share across threads.
#[derive(Debug, Clone)]
pub struct EnergyAccountant<P: AllocationPolicy = PvFirstPolicy> {
    params: ModelParameters,
    pv_model: PvGenerationModel,
    workload_model: WorkloadPowerModel,
    policy: P,
    carbon: CarbonModel,
    water: WaterFootprintModel,
    stats: EnergyStatistics,
    time_base: TimeBase,
}

impl EnergyAccountant<PvFirstPolicy> {
    /// Accountant with the PV-first policy
    ///
    /// Uses fixed-step mode when `params.fixed_step_seconds` is set, explicit
    /// elapsed time otherwise.
    pub fn new(params: ModelParameters) -> Result<Self, ModelError> {
        Self::with_policy(params, PvFirstPolicy)
    }

    /// Clock-driven accountant, synchronised to `clock` at construction
    pub fn with_clock<C>(params: ModelParameters, clock: &C) -> Result<Self, ModelError>
    where
        C: SimulationClock + ?Sized,
    {
        if let Some(step_s) = params.fixed_step_seconds {
            debug!(step_s, "fixed step ignored in clock-driven mode");
        }
        let mut accountant = Self::new(params)?;
        accountant.time_base = TimeBase::Clock {
            last_update_seconds: clock.now_seconds(),
        };
        Ok(accountant)
    }
}

impl<P: AllocationPolicy> EnergyAccountant<P> {
    pub fn with_policy(params: ModelParameters, policy: P) -> Result<Self, ModelError> {
        params.validate()?;

        let time_base = match params.fixed_step_seconds {
            Some(step_seconds) => TimeBase::FixedStep { step_seconds },
            None => TimeBase::Explicit,
        };

        Ok(Self {
            pv_model: PvGenerationModel::new(params.pv),
            workload_model: WorkloadPowerModel,
            carbon: CarbonModel::new(params.grid_carbon_intensity_g_per_kwh),
            water: WaterFootprintModel::new(params.water_intensity_l_per_kwh),
            stats: EnergyStatistics::default(),
            params,
            policy,
            time_base,
        })
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.params
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    /// Snapshot of the cumulative totals
    pub fn statistics(&self) -> EnergyStatistics {
        self.stats
    }

    /// Clock reading of the last applied transition (clock-driven mode)
    pub fn last_update_seconds(&self) -> Option<f64> {
        match self.time_base {
            TimeBase::Clock {
                last_update_seconds,
            } => Some(last_update_seconds),
            _ => None,
        }
    }

    /// Account one interval with an explicit length
    ///
    /// Returns `Ok(None)` without touching any state when
    /// `elapsed_seconds <= 0`. Invalid readings are rejected before any
    /// state changes. A clock-driven accountant only accepts time from its
    /// clock, so this returns [`AccountingError::ModeMismatch`] there.
    pub fn update(
        &mut self,
        inputs: &IntervalInputs,
    ) -> Result<Option<IntervalRecord>, AccountingError> {
        if let TimeBase::Clock { .. } = self.time_base {
            return Err(AccountingError::ModeMismatch("explicit"));
        }
        self.transition(inputs)
    }

    fn transition(
        &mut self,
        inputs: &IntervalInputs,
    ) -> Result<Option<IntervalRecord>, AccountingError> {
        if inputs.elapsed_seconds.is_finite() && inputs.elapsed_seconds <= 0.0 {
            trace!(elapsed_s = inputs.elapsed_seconds, "time has not advanced, skipping");
            return Ok(None);
        }
        inputs.validate()?;

        Ok(Some(self.apply(inputs)))
    }

    /// Account one fixed step with the given readings
    pub fn advance(&mut self, readings: Readings) -> Result<Option<IntervalRecord>, AccountingError> {
        match self.time_base {
            TimeBase::FixedStep { step_seconds } => self.transition(&readings.over(step_seconds)),
            _ => Err(AccountingError::ModeMismatch("fixed-step")),
        }
    }

    /// Account the time elapsed on `clock` since the last transition
    ///
    /// The clock reference only moves when a transition is applied, so
    /// repeated notifications at the same simulated time are idempotent.
    pub fn sync_with_clock<C>(
        &mut self,
        clock: &C,
        readings: Readings,
    ) -> Result<Option<IntervalRecord>, AccountingError>
    where
        C: SimulationClock + ?Sized,
    {
        let last = match self.time_base {
            TimeBase::Clock {
                last_update_seconds,
            } => last_update_seconds,
            _ => return Err(AccountingError::ModeMismatch("clock-driven")),
        };

        let now = clock.now_seconds();
        let record = self.transition(&readings.over(now - last))?;
        if record.is_some() {
            self.time_base = TimeBase::Clock {
                last_update_seconds: now,
            };
        }
        Ok(record)
    }

    fn apply(&mut self, inputs: &IntervalInputs) -> IntervalRecord {
        let elapsed = inputs.elapsed_seconds;

        let factors = inputs
            .weather
            .as_ref()
            .map(|obs| DeratingFactors::with_coefficients(obs, &self.params.derating))
            .unwrap_or(DeratingFactors::NEUTRAL);
        let effective_irradiance = factors.apply_to(inputs.irradiance);

        let pv_power = self
            .pv_model
            .derated_power(effective_irradiance, factors.efficiency_factor());
        let pv_energy = pv_power.energy_over(elapsed);
        let demand = self.workload_model.energy(inputs.workload_power, elapsed);

        let allocation = self.policy.allocate(pv_energy, demand);

        let co2 = self.carbon.emissions(allocation.grid_used);
        let water = self.water.water_use(allocation.grid_used);
        self.stats.record(elapsed, &allocation, co2, water);

        debug!(
            elapsed_s = elapsed,
            pv_w = pv_power.as_watts(),
            demand_kwh = demand.as_kilowatt_hours(),
            pv_used_kwh = allocation.pv_used.as_kilowatt_hours(),
            grid_used_kwh = allocation.grid_used.as_kilowatt_hours(),
            co2_g = co2.as_grams(),
            policy = self.policy.name(),
            "interval accounted"
        );

        IntervalRecord {
            elapsed_seconds: elapsed,
            raw_irradiance: inputs.irradiance,
            effective_irradiance,
            factors,
            temperature_c: inputs.weather.and_then(|w| w.temperature_c),
            pv_power,
            pv_energy,
            demand,
            allocation,
            co2,
            water,
        }
    }
}
