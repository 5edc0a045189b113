//! External service connectors.
//!
//! Every integration is a trait object injected through `web::Data`, so the
//! handlers never depend on the HTTP implementation and tests can swap in a mock.

pub mod chat_model;
pub mod errors;

pub use chat_model::{ChatModelClient, ChatModelConnector, DisabledChatModel};
pub use errors::ConnectorError;

pub use chat_model::init as init_chat_model;
