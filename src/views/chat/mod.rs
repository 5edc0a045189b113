mod exchange;
mod message;
mod search;
mod session;

pub use exchange::{Deleted, Edited, Sent};
pub use message::Message;
pub use search::SearchHit;
pub use session::SessionDetail;
