pub mod activity;
pub mod feedback;
pub mod message;
pub mod pattern;
pub mod session;
pub mod snapshot;
