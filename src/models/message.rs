use super::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Bot => "bot",
            MessageRole::System => "system",
        }
    }
}

impl TryFrom<String> for MessageRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(MessageRole::User),
            "bot" => Ok(MessageRole::Bot),
            "system" => Ok(MessageRole::System),
            _ => Err(UnknownVariant {
                kind: "message_type",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: i32,
    pub session_id: i32,
    #[sqlx(try_from = "String")]
    pub message_type: MessageRole,
    pub content: String,
    /// For bot replies: the user message being answered.
    pub linked_message_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_bot(&self) -> bool {
        self.message_type == MessageRole::Bot
    }

    pub fn is_user(&self) -> bool {
        self.message_type == MessageRole::User
    }
}

/// A message matched by full-text search, with its session title.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageSearchHit {
    pub id: i32,
    pub session_id: i32,
    pub session_title: String,
    #[sqlx(try_from = "String")]
    pub message_type: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_label() {
        for role in [MessageRole::User, MessageRole::Bot, MessageRole::System] {
            let parsed = MessageRole::try_from(role.as_str().to_string()).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = MessageRole::try_from("assistant".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "unknown message_type value 'assistant'");
    }
}
