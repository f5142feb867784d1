//! # Simulation Support
//!
//! Everything needed to drive the accountant without live sensors.
//!
//! ## Components
//!
//! - **Clock**: simulated time source for clock-driven accounting
//! - **Solar**: clear-sky irradiance from solar geometry
//! - **Profile**: replay of irradiance sequences (synthetic or clear-sky day)
//!
//! ## Usage
//!
//! ```rust
//! use pvfirst_accountant::accountant::ModelParameters;
//! use pvfirst_accountant::simulation::run_synthetic_profile;
//!
//! let run = run_synthetic_profile(ModelParameters::default()).unwrap();
//! assert_eq!(run.steps.len(), 7);
//! println!("{}", run.totals);
//! ```

pub mod clock;
pub mod profile;
pub mod solar;

pub use clock::{ManualClock, SimulationClock};
pub use profile::{
    clear_sky_day, run_synthetic_profile, simulate_clear_sky_day, ProfileRun, ProfileRunner,
    ProfileStep, SYNTHETIC_HOST_POWER_W, SYNTHETIC_PROFILE_W_M2, SYNTHETIC_STEP_SECONDS,
};
pub use solar::{clear_sky_irradiance, decimal_hour, ClearSkyModel, PEAK_IRRADIANCE_W_M2};
