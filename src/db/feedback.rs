use crate::models;
use sqlx::{PgConnection, PgPool};
use tracing::Instrument;

/// Creates the (message, user) vote or overwrites its kind.
pub async fn upsert(
    conn: &mut PgConnection,
    message_id: i32,
    user_id: &str,
    kind: models::FeedbackKind,
) -> Result<models::MessageFeedback, String> {
    let query_span = tracing::info_span!("Saving message feedback into the database");
    sqlx::query_as::<_, models::MessageFeedback>(
        r#"
        INSERT INTO message_feedback (message_id, user_id, feedback_type, created_at, updated_at)
        VALUES ($1, $2, $3, NOW(), NOW())
        ON CONFLICT ON CONSTRAINT message_feedback_message_user_key
        DO UPDATE SET feedback_type = EXCLUDED.feedback_type, updated_at = NOW()
        RETURNING id, message_id, user_id, feedback_type, created_at, updated_at
        "#,
    )
    .bind(message_id)
    .bind(user_id)
    .bind(kind.as_str())
    .fetch_one(conn)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to save feedback".to_string()
    })
}

/// (all votes, positive votes) across every user and message.
pub async fn totals(pool: &PgPool) -> Result<(i64, i64), String> {
    let query_span = tracing::info_span!("Count feedback totals.");
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE feedback_type = 'positive') AS positive
        FROM message_feedback
        "#,
    )
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to count feedback, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}
