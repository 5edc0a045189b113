use crate::models;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::convert::From;

const SNIPPET_LEN: usize = 200;

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: i32,
    pub session_id: i32,
    pub session_title: String,
    pub message_type: models::MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

fn snippet(content: &str) -> String {
    let mut chars = content.chars();
    let mut snippet: String = chars.by_ref().take(SNIPPET_LEN).collect();
    if chars.next().is_some() {
        snippet.push_str("...");
    }
    snippet
}

impl From<models::MessageSearchHit> for SearchHit {
    fn from(hit: models::MessageSearchHit) -> Self {
        Self {
            id: hit.id,
            session_id: hit.session_id,
            session_title: hit.session_title,
            message_type: hit.message_type,
            content: snippet(&hit.content),
            created_at: hit.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_content_is_cut_with_ellipsis() {
        let cut = snippet(&"é".repeat(250));
        assert_eq!(cut.chars().count(), SNIPPET_LEN + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(snippet("AES is symmetric"), "AES is symmetric");
        assert_eq!(snippet(&"x".repeat(200)), "x".repeat(200));
    }
}
