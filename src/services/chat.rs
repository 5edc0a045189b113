//! Message lifecycle: sending, editing and deleting, each keeping the
//! user message and its bot reply consistent.

use crate::db;
use crate::helpers::JsonResponse;
use crate::models::{self, ChatSession, Message, MessageRole};
use crate::services::response_selector::{Responder, ResponseSource};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Chat session not found")]
    SessionNotFound,
    #[error("Message not found")]
    MessageNotFound,
    #[error("{0}")]
    Database(String),
}

impl From<sqlx::Error> for ChatError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Chat transaction failed: {:?}", err);
        ChatError::Database("Internal Server Error".to_string())
    }
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
            ChatError::SessionNotFound | ChatError::MessageNotFound => StatusCode::NOT_FOUND,
            ChatError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        JsonResponse::<()>::build().http_response(self.status_code(), self.to_string())
    }
}

#[derive(Debug)]
pub struct Exchange {
    pub session: ChatSession,
    pub user_message: Message,
    pub bot_message: Message,
    pub source: Option<ResponseSource>,
}

#[derive(Debug)]
pub struct Revision {
    pub user_message: Message,
    pub removed_bot_id: Option<i32>,
    pub new_bot_message: Message,
    pub source: Option<ResponseSource>,
}

fn non_empty(text: &str) -> Result<&str, ChatError> {
    let text = text.trim();
    if text.is_empty() {
        Err(ChatError::EmptyMessage)
    } else {
        Ok(text)
    }
}

/// Posts `text` to `session_id`, or to a new session named after it, and
/// stores the generated reply linked to it.
#[tracing::instrument(name = "Send chat message", skip(pool, responder, user, text), fields(user_id = %user.id))]
pub async fn send(
    pool: &PgPool,
    responder: &Responder,
    user: &models::User,
    text: &str,
    session_id: Option<i32>,
) -> Result<Exchange, ChatError> {
    let text = non_empty(text)?;

    let session = match session_id {
        Some(id) => db::session::fetch_owned(pool, id, &user.id)
            .await
            .map_err(ChatError::Database)?
            .ok_or(ChatError::SessionNotFound)?,
        None => db::session::insert(pool, &user.id, &ChatSession::title_from_message(text))
            .await
            .map_err(ChatError::Database)?,
    };

    let reply = responder.respond(pool, text).await;

    let mut tx = pool.begin().await?;
    let user_message = db::message::insert(&mut *tx, session.id, MessageRole::User, text)
        .await
        .map_err(ChatError::Database)?;
    let bot_message = db::message::insert_reply(&mut *tx, &user_message, &reply.text)
        .await
        .map_err(ChatError::Database)?;
    db::session::touch(&mut *tx, session.id)
        .await
        .map_err(ChatError::Database)?;
    tx.commit().await?;

    Ok(Exchange {
        session,
        user_message,
        bot_message,
        source: reply.source,
    })
}

/// Replaces the text of one of the user's own messages and swaps its reply
/// for a freshly generated one.
#[tracing::instrument(name = "Edit chat message", skip(pool, responder, user, new_text), fields(user_id = %user.id))]
pub async fn edit(
    pool: &PgPool,
    responder: &Responder,
    user: &models::User,
    message_id: i32,
    new_text: &str,
) -> Result<Revision, ChatError> {
    let new_text = non_empty(new_text)?;

    let message = db::message::fetch_owned(pool, message_id, &user.id)
        .await
        .map_err(ChatError::Database)?
        .filter(Message::is_user)
        .ok_or(ChatError::MessageNotFound)?;

    let reply = responder.respond(pool, new_text).await;

    let mut tx = pool.begin().await?;
    let user_message = db::message::update_content(&mut *tx, message.id, new_text)
        .await
        .map_err(ChatError::Database)?;

    let previous = db::message::fetch_reply(&mut *tx, message.id)
        .await
        .map_err(ChatError::Database)?;
    if let Some(previous) = &previous {
        db::message::delete(&mut *tx, previous.id)
            .await
            .map_err(ChatError::Database)?;
    }

    let new_bot_message = db::message::insert_reply(&mut *tx, &user_message, &reply.text)
        .await
        .map_err(ChatError::Database)?;
    db::session::touch(&mut *tx, message.session_id)
        .await
        .map_err(ChatError::Database)?;
    tx.commit().await?;

    Ok(Revision {
        user_message,
        removed_bot_id: previous.map(|previous| previous.id),
        new_bot_message,
        source: reply.source,
    })
}

/// Deletes one of the user's messages together with the other half of its
/// exchange. Returns every removed id.
#[tracing::instrument(name = "Delete chat message", skip(pool, user), fields(user_id = %user.id))]
pub async fn delete(
    pool: &PgPool,
    user: &models::User,
    message_id: i32,
) -> Result<Vec<i32>, ChatError> {
    let message = db::message::fetch_owned(pool, message_id, &user.id)
        .await
        .map_err(ChatError::Database)?
        .ok_or(ChatError::MessageNotFound)?;

    // a bot reply takes its question with it; the question's replies cascade
    let root_id = match (message.message_type, message.linked_message_id) {
        (MessageRole::Bot, Some(linked_id)) => linked_id,
        _ => message.id,
    };

    let mut deleted_ids = vec![root_id];
    let replies = db::message::fetch_reply_ids(pool, root_id)
        .await
        .map_err(ChatError::Database)?;
    deleted_ids.extend(replies);

    let mut tx = pool.begin().await?;
    db::message::delete(&mut *tx, root_id)
        .await
        .map_err(ChatError::Database)?;
    db::session::touch(&mut *tx, message.session_id)
        .await
        .map_err(ChatError::Database)?;
    tx.commit().await?;

    Ok(deleted_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(matches!(non_empty("  \n\t"), Err(ChatError::EmptyMessage)));
        assert_eq!(non_empty("  hi  ").unwrap(), "hi");
    }

    #[test]
    fn missing_records_are_not_found() {
        assert_eq!(ChatError::SessionNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ChatError::MessageNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ChatError::EmptyMessage.status_code(), StatusCode::BAD_REQUEST);
    }
}
