//! Generation and demand models. Both are stateless and convert a power
//! level held over an interval into energy.

pub mod pv;
pub mod workload;

pub use pv::{PvArray, PvGenerationModel};
pub use workload::WorkloadPowerModel;
