use super::Message;
use crate::models;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: models::ChatSession,
    pub messages: Vec<Message>,
}

impl SessionDetail {
    pub fn new(session: models::ChatSession, messages: Vec<models::Message>) -> Self {
        Self {
            session,
            messages: messages.into_iter().map(Message::from).collect(),
        }
    }
}
