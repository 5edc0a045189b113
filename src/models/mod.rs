mod activity;
mod feedback;
mod message;
mod pattern;
mod session;
mod snapshot;
pub mod user;

pub use activity::*;
pub use feedback::*;
pub use message::*;
pub use pattern::*;
pub use session::*;
pub use snapshot::*;
pub use user::*;

/// A stored label that no longer maps onto one of our enums.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
