mod callable;
pub mod model;

pub use callable::*;
