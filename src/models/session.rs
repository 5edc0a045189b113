use chrono::{DateTime, Utc};
use serde::Serialize;

const TITLE_PREVIEW_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session row plus the number of messages it holds.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatSessionSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub session: ChatSession,
    pub message_count: i64,
}

impl ChatSession {
    /// Title for a session opened by `message`: its first 50 chars, with an
    /// ellipsis when cut.
    pub fn title_from_message(message: &str) -> String {
        let mut chars = message.chars();
        let mut title: String = chars.by_ref().take(TITLE_PREVIEW_LEN).collect();
        if chars.next().is_some() {
            title.push_str("...");
        }
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_kept_whole() {
        assert_eq!(ChatSession::title_from_message("hello"), "hello");
    }

    #[test]
    fn long_message_is_cut_at_fifty_chars() {
        let message = "é".repeat(60);
        let title = ChatSession::title_from_message(&message);
        assert_eq!(title, format!("{}...", "é".repeat(50)));
    }

    #[test]
    fn exactly_fifty_chars_has_no_ellipsis() {
        let message = "a".repeat(50);
        assert_eq!(ChatSession::title_from_message(&message), message);
    }
}
