use crate::models;
use crate::services::ResponseSource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::convert::From;

#[derive(Debug, Serialize)]
pub struct Message {
    pub id: i32,
    pub session_id: i32,
    pub message_type: models::MessageRole,
    pub content: String,
    pub linked_message_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    /// Only known right after the reply was generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ResponseSource>,
}

impl Message {
    pub fn with_source(mut self, source: Option<ResponseSource>) -> Self {
        self.source = source;
        self
    }
}

impl From<models::Message> for Message {
    fn from(message: models::Message) -> Self {
        Self {
            id: message.id,
            session_id: message.session_id,
            message_type: message.message_type,
            content: message.content,
            linked_message_id: message.linked_message_id,
            created_at: message.created_at,
            source: None,
        }
    }
}
