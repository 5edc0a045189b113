use crate::models;
use sqlx::{PgConnection, PgPool};
use tracing::Instrument;

pub async fn fetch(pool: &PgPool, id: i32) -> Result<Option<models::ChatSession>, String> {
    let query_span = tracing::info_span!("Fetch chat session by id.");
    sqlx::query_as::<_, models::ChatSession>(
        r#"
        SELECT id, user_id, title, is_active, created_at, updated_at
        FROM chat_session
        WHERE id = $1
        LIMIT 1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chat session, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

/// Session `id` if it belongs to `user_id`.
pub async fn fetch_owned(
    pool: &PgPool,
    id: i32,
    user_id: &str,
) -> Result<Option<models::ChatSession>, String> {
    fetch(pool, id)
        .await
        .map(|session| session.filter(|session| session.user_id == user_id))
}

pub async fn fetch_by_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<models::ChatSessionSummary>, String> {
    let query_span = tracing::info_span!("Fetch chat sessions of a user.");
    sqlx::query_as::<_, models::ChatSessionSummary>(
        r#"
        SELECT
            s.id, s.user_id, s.title, s.is_active, s.created_at, s.updated_at,
            COUNT(m.id) AS message_count
        FROM chat_session s
        LEFT JOIN chat_message m ON m.session_id = s.id
        WHERE s.user_id = $1
        GROUP BY s.id
        ORDER BY s.updated_at DESC, s.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chat sessions, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn insert(
    pool: &PgPool,
    user_id: &str,
    title: &str,
) -> Result<models::ChatSession, String> {
    let query_span = tracing::info_span!("Saving new chat session into the database");
    sqlx::query_as::<_, models::ChatSession>(
        r#"
        INSERT INTO chat_session (user_id, title, is_active, created_at, updated_at)
        VALUES ($1, $2, TRUE, NOW(), NOW())
        RETURNING id, user_id, title, is_active, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert".to_string()
    })
}

pub async fn update(
    pool: &PgPool,
    session: models::ChatSession,
) -> Result<models::ChatSession, String> {
    let query_span = tracing::info_span!("Updating chat session");
    sqlx::query_as::<_, models::ChatSession>(
        r#"
        UPDATE chat_session
        SET
            title = $2,
            is_active = $3,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, title, is_active, created_at, updated_at
        "#,
    )
    .bind(session.id)
    .bind(&session.title)
    .bind(session.is_active)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Could not update".to_string()
    })
}

/// Bumps `updated_at` so the session sorts first in the listing.
pub async fn touch(conn: &mut PgConnection, id: i32) -> Result<(), String> {
    sqlx::query("UPDATE chat_session SET updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Failed to touch chat session {}: {:?}", id, err);
            "Could not update".to_string()
        })
}

#[tracing::instrument(name = "Delete chat session.", skip(pool))]
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, String> {
    sqlx::query::<sqlx::Postgres>("DELETE FROM chat_session WHERE id = $1;")
        .bind(id)
        .execute(pool)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Failed to delete chat session: {:?}", err);
            "Failed to delete chat session".to_string()
        })
}
