use super::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Negative,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Positive => "positive",
            FeedbackKind::Negative => "negative",
        }
    }
}

impl TryFrom<String> for FeedbackKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "positive" => Ok(FeedbackKind::Positive),
            "negative" => Ok(FeedbackKind::Negative),
            _ => Err(UnknownVariant {
                kind: "feedback_type",
                value,
            }),
        }
    }
}

/// One vote of one user on one bot message.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageFeedback {
    pub id: i32,
    pub message_id: i32,
    pub user_id: String,
    #[sqlx(try_from = "String")]
    pub feedback_type: FeedbackKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
