pub mod retrain;
pub mod stats;

pub use retrain::*;
pub use stats::*;
