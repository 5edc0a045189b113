use crate::models;
use sqlx::{PgConnection, PgPool};
use tracing::Instrument;

const PATTERN_COLUMNS: &str = r#"
    id, user_input, bot_response, positive_feedback_count, negative_feedback_count,
    total_uses, success_rate, context_keywords, response_category, created_at, last_updated
"#;

/// Patterns sharing a keyword or the category with the current input, best first.
pub async fn fetch_similar(
    pool: &PgPool,
    keywords: &[String],
    category: &str,
    min_samples: i32,
    limit: i64,
) -> Result<Vec<models::ResponsePattern>, String> {
    let query_span = tracing::info_span!("Search for similar response patterns.");
    sqlx::query_as::<_, models::ResponsePattern>(&format!(
        r#"
        SELECT {PATTERN_COLUMNS}
        FROM response_pattern
        WHERE (context_keywords && $1 OR response_category = $2)
          AND total_uses >= $3
        ORDER BY success_rate DESC, total_uses DESC, id ASC
        LIMIT $4
        "#
    ))
    .bind(keywords)
    .bind(category)
    .bind(min_samples)
    .bind(limit)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch similar patterns, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

/// Get-or-create the pattern for a keyed (input, response) pair and count one
/// vote on it. The row stays locked until the surrounding transaction ends.
pub async fn register_vote(
    conn: &mut PgConnection,
    user_input: &str,
    bot_response: &str,
    keywords: &[String],
    category: &str,
    kind: models::FeedbackKind,
) -> Result<models::ResponsePattern, String> {
    let (positive, negative) = match kind {
        models::FeedbackKind::Positive => (1, 0),
        models::FeedbackKind::Negative => (0, 1),
    };

    let query_span = tracing::info_span!("Counting a vote on a response pattern");
    sqlx::query_as::<_, models::ResponsePattern>(&format!(
        r#"
        INSERT INTO response_pattern (
            user_input,
            bot_response,
            positive_feedback_count,
            negative_feedback_count,
            total_uses,
            context_keywords,
            response_category,
            created_at,
            last_updated
        )
        VALUES ($1, $2, $3, $4, 1, $5, $6, NOW(), NOW())
        ON CONFLICT ((md5(user_input)), (md5(bot_response)))
        DO UPDATE SET
            positive_feedback_count = response_pattern.positive_feedback_count + EXCLUDED.positive_feedback_count,
            negative_feedback_count = response_pattern.negative_feedback_count + EXCLUDED.negative_feedback_count,
            total_uses = response_pattern.total_uses + 1,
            last_updated = NOW()
        RETURNING {PATTERN_COLUMNS}
        "#
    ))
    .bind(user_input)
    .bind(bot_response)
    .bind(positive)
    .bind(negative)
    .bind(keywords)
    .bind(category)
    .fetch_one(conn)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to update response pattern".to_string()
    })
}

pub async fn save_success_rate(
    conn: &mut PgConnection,
    pattern: &models::ResponsePattern,
) -> Result<(), String> {
    sqlx::query("UPDATE response_pattern SET success_rate = $2 WHERE id = $1")
        .bind(pattern.id)
        .bind(pattern.success_rate)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Failed to save success rate of pattern {}: {:?}", pattern.id, err);
            "Failed to update response pattern".to_string()
        })
}

/// (all patterns, patterns with success_rate >= threshold).
pub async fn totals(pool: &PgPool, success_threshold: f64) -> Result<(i64, i64), String> {
    let query_span = tracing::info_span!("Count response patterns.");
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE success_rate >= $1) AS successful
        FROM response_pattern
        "#,
    )
    .bind(success_threshold)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to count patterns, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}
