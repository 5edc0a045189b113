use chrono::{DateTime, Utc};
use serde::Serialize;

pub const PATTERN_INPUT_LEN: usize = 500;
pub const PATTERN_RESPONSE_LEN: usize = 1000;

/// A remembered (input, response) pair with the feedback it has collected.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ResponsePattern {
    pub id: i32,
    pub user_input: String,
    pub bot_response: String,
    pub positive_feedback_count: i32,
    pub negative_feedback_count: i32,
    pub total_uses: i32,
    pub success_rate: f64,
    pub context_keywords: Vec<String>,
    pub response_category: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl ResponsePattern {
    /// positive / (positive + negative), 0 while nobody voted.
    pub fn ratio(positive: i32, negative: i32) -> f64 {
        let total = positive + negative;
        if total > 0 {
            f64::from(positive) / f64::from(total)
        } else {
            0.0
        }
    }

    pub fn update_success_rate(&mut self) {
        self.success_rate = Self::ratio(self.positive_feedback_count, self.negative_feedback_count);
    }

    /// Storage key of a pattern: input and response cut to the column widths.
    pub fn key(user_input: &str, bot_response: &str) -> (String, String) {
        (
            user_input.chars().take(PATTERN_INPUT_LEN).collect(),
            bot_response.chars().take(PATTERN_RESPONSE_LEN).collect(),
        )
    }
}

#[cfg(test)]
pub(crate) fn pattern_fixture(response: &str, success_rate: f64, total_uses: i32) -> ResponsePattern {
    ResponsePattern {
        id: 1,
        user_input: "fixture input".to_string(),
        bot_response: response.to_string(),
        positive_feedback_count: 0,
        negative_feedback_count: 0,
        total_uses,
        success_rate,
        context_keywords: vec![],
        response_category: "helpful".to_string(),
        created_at: Utc::now(),
        last_updated: Utc::now(),
    }
}
