use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

pub const MIN_SEARCH_LEN: usize = 2;
pub const SEARCH_LIMIT: i64 = 50;

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct SendMessage {
    #[validate(min_length = 1)]
    pub message: String,
    pub session_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct EditMessage {
    #[validate(min_length = 1)]
    pub new_text: String,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct UpdateSession {
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    pub title: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateSession {
    pub fn update(self, session: &mut models::ChatSession) -> Result<(), String> {
        if let Some(title) = self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err("Title cannot be empty".to_string());
            }
            session.title = title.to_string();
        }

        if let Some(is_active) = self.is_active {
            session.is_active = is_active;
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct Feedback {
    pub message_id: i32,
    pub feedback_type: models::FeedbackKind,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(min_length = 2)]
    pub query: String,
    pub session_id: Option<i32>,
}

impl SearchQuery {
    /// The trimmed search text, if it is long enough to search for.
    pub fn terms(&self) -> Option<&str> {
        let query = self.query.trim();
        (query.chars().count() >= MIN_SEARCH_LEN).then_some(query)
    }
}
