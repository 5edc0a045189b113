use super::Message;
use crate::services::chat::{Exchange, Revision};
use serde::Serialize;

/// A stored user message with the reply generated for it.
#[derive(Debug, Serialize)]
pub struct Sent {
    pub session_id: i32,
    pub session_title: String,
    pub user_message: Message,
    pub bot_message: Message,
}

impl From<Exchange> for Sent {
    fn from(exchange: Exchange) -> Self {
        Self {
            session_id: exchange.session.id,
            session_title: exchange.session.title,
            user_message: exchange.user_message.into(),
            bot_message: Message::from(exchange.bot_message).with_source(exchange.source),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Edited {
    pub user_message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_bot_id: Option<i32>,
    pub new_bot_message: Message,
}

impl From<Revision> for Edited {
    fn from(revision: Revision) -> Self {
        Self {
            user_message: revision.user_message.into(),
            removed_bot_id: revision.removed_bot_id,
            new_bot_message: Message::from(revision.new_bot_message).with_source(revision.source),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{self, MessageRole};
    use crate::services::ResponseSource;
    use chrono::Utc;

    fn message(id: i32, message_type: MessageRole, linked_message_id: Option<i32>) -> models::Message {
        models::Message {
            id,
            session_id: 3,
            message_type,
            content: format!("message {id}"),
            linked_message_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_the_bot_message_carries_its_source() {
        let exchange = Exchange {
            session: models::ChatSession {
                id: 3,
                user_id: "u1".to_string(),
                title: "hello".to_string(),
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            user_message: message(10, MessageRole::User, None),
            bot_message: message(11, MessageRole::Bot, Some(10)),
            source: Some(ResponseSource::KnowledgeBase),
        };

        let value = serde_json::to_value(Sent::from(exchange)).unwrap();

        assert_eq!(value["session_id"], 3);
        assert!(value["user_message"].get("source").is_none());
        assert_eq!(value["bot_message"]["source"], "knowledge_base");
        assert_eq!(value["bot_message"]["linked_message_id"], 10);
        assert_eq!(value["bot_message"]["message_type"], "bot");
    }
}
