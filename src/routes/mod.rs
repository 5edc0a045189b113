pub(crate) mod activity;
pub mod chat;
pub mod health_checks;
pub mod model;

pub use health_checks::*;
