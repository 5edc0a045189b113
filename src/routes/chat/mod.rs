pub mod feedback;
pub mod message;
pub mod search;
pub mod send;
pub mod session;
