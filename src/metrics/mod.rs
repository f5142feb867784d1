//! Environmental metrics derived from grid-supplied energy. PV energy is
//! treated as free of both emissions and water use.

pub mod carbon;
pub mod water;

pub use carbon::CarbonModel;
pub use water::WaterFootprintModel;
