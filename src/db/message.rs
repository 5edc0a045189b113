use crate::models;
use sqlx::{PgConnection, PgPool};
use tracing::Instrument;

const MESSAGE_COLUMNS: &str =
    "m.id, m.session_id, m.message_type, m.content, m.linked_message_id, m.created_at";

pub async fn fetch(pool: &PgPool, id: i32) -> Result<Option<models::Message>, String> {
    let query_span = tracing::info_span!("Fetch chat message by id.");
    sqlx::query_as::<_, models::Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM chat_message m WHERE m.id = $1 LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chat message, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

/// Message `id` if its session belongs to `user_id`.
pub async fn fetch_owned(
    pool: &PgPool,
    id: i32,
    user_id: &str,
) -> Result<Option<models::Message>, String> {
    let query_span = tracing::info_span!("Fetch chat message of a user.");
    sqlx::query_as::<_, models::Message>(&format!(
        r#"
        SELECT {MESSAGE_COLUMNS}
        FROM chat_message m
        JOIN chat_session s ON s.id = m.session_id
        WHERE m.id = $1 AND s.user_id = $2
        LIMIT 1
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chat message, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn fetch_by_session(
    pool: &PgPool,
    session_id: i32,
) -> Result<Vec<models::Message>, String> {
    let query_span = tracing::info_span!("Fetch messages of a chat session.");
    sqlx::query_as::<_, models::Message>(&format!(
        r#"
        SELECT {MESSAGE_COLUMNS}
        FROM chat_message m
        WHERE m.session_id = $1
        ORDER BY m.created_at ASC, m.id ASC
        "#
    ))
    .bind(session_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch messages, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

/// The bot reply linked to user message `message_id`, if any.
pub async fn fetch_reply(
    conn: &mut PgConnection,
    message_id: i32,
) -> Result<Option<models::Message>, String> {
    let query_span = tracing::info_span!("Fetch reply of a chat message.");
    sqlx::query_as::<_, models::Message>(&format!(
        r#"
        SELECT {MESSAGE_COLUMNS}
        FROM chat_message m
        WHERE m.linked_message_id = $1
        ORDER BY m.id ASC
        LIMIT 1
        "#
    ))
    .bind(message_id)
    .fetch_optional(conn)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch reply, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn fetch_reply_ids(pool: &PgPool, message_id: i32) -> Result<Vec<i32>, String> {
    sqlx::query_scalar::<_, i32>(
        "SELECT id FROM chat_message WHERE linked_message_id = $1 ORDER BY id ASC",
    )
    .bind(message_id)
    .fetch_all(pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch reply ids, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

async fn insert_row(
    conn: &mut PgConnection,
    session_id: i32,
    role: models::MessageRole,
    content: &str,
    linked_message_id: Option<i32>,
) -> Result<models::Message, String> {
    let query_span = tracing::info_span!("Saving new chat message into the database");
    sqlx::query_as::<_, models::Message>(
        r#"
        INSERT INTO chat_message (session_id, message_type, content, linked_message_id, created_at)
        VALUES ($1, $2, $3, $4, clock_timestamp())
        RETURNING id, session_id, message_type, content, linked_message_id, created_at
        "#,
    )
    .bind(session_id)
    .bind(role.as_str())
    .bind(content)
    .bind(linked_message_id)
    .fetch_one(conn)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert".to_string()
    })
}

pub async fn insert(
    conn: &mut PgConnection,
    session_id: i32,
    role: models::MessageRole,
    content: &str,
) -> Result<models::Message, String> {
    insert_row(conn, session_id, role, content, None).await
}

/// Stores a bot reply answering `reply_to`. Both must share a session.
pub async fn insert_reply(
    conn: &mut PgConnection,
    reply_to: &models::Message,
    content: &str,
) -> Result<models::Message, String> {
    if !reply_to.is_user() {
        tracing::error!("Refusing to link a reply to non-user message {}", reply_to.id);
        return Err("Replies must answer a user message".to_string());
    }

    insert_row(
        conn,
        reply_to.session_id,
        models::MessageRole::Bot,
        content,
        Some(reply_to.id),
    )
    .await
}

pub async fn update_content(
    conn: &mut PgConnection,
    id: i32,
    content: &str,
) -> Result<models::Message, String> {
    let query_span = tracing::info_span!("Updating chat message");
    sqlx::query_as::<_, models::Message>(
        r#"
        UPDATE chat_message
        SET content = $2
        WHERE id = $1
        RETURNING id, session_id, message_type, content, linked_message_id, created_at
        "#,
    )
    .bind(id)
    .bind(content)
    .fetch_one(conn)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Could not update".to_string()
    })
}

/// Deletes message `id`. Replies linked to it go with it (FK cascade).
pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<bool, String> {
    tracing::info!("Delete chat message {}", id);
    sqlx::query::<sqlx::Postgres>("DELETE FROM chat_message WHERE id = $1;")
        .bind(id)
        .execute(conn)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Failed to delete chat message: {:?}", err);
            "Failed to delete chat message".to_string()
        })
}

/// Escapes LIKE wildcards so `query` matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub async fn search(
    pool: &PgPool,
    user_id: &str,
    query: &str,
    session_id: Option<i32>,
    limit: i64,
) -> Result<Vec<models::MessageSearchHit>, String> {
    let query_span = tracing::info_span!("Search chat messages of a user.");
    sqlx::query_as::<_, models::MessageSearchHit>(
        r#"
        SELECT
            m.id, m.session_id, s.title AS session_title, m.message_type, m.content, m.created_at
        FROM chat_message m
        JOIN chat_session s ON s.id = m.session_id
        WHERE s.user_id = $1
          AND m.content ILIKE $2 ESCAPE '\'
          AND ($3::integer IS NULL OR m.session_id = $3)
        ORDER BY m.created_at DESC, m.id DESC
        LIMIT $4
        "#,
    )
    .bind(user_id)
    .bind(like_pattern(query))
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to search messages, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
