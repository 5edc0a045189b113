pub(crate) mod json;
pub(crate) mod request;

pub use json::*;
pub use request::*;
