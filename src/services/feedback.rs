//! Turns a thumbs up or down on a bot message into pattern statistics.

use crate::db;
use crate::helpers::JsonResponse;
use crate::models::{self, FeedbackKind, MessageFeedback, ResponsePattern};
use crate::services::categorizer::categorize;
use crate::services::keywords::extract_keywords;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Message not found")]
    MessageNotFound,
    #[error("Feedback can only be given on bot messages")]
    NotBotMessage,
    #[error("Bot message has no linked user message")]
    NoLinkedInput,
    #[error("{0}")]
    Database(String),
}

impl From<sqlx::Error> for FeedbackError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Feedback transaction failed: {:?}", err);
        FeedbackError::Database("Failed to record feedback".to_string())
    }
}

impl ResponseError for FeedbackError {
    fn status_code(&self) -> StatusCode {
        match self {
            FeedbackError::MessageNotFound => StatusCode::NOT_FOUND,
            FeedbackError::NotBotMessage | FeedbackError::NoLinkedInput => StatusCode::BAD_REQUEST,
            FeedbackError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        JsonResponse::<()>::build().http_response(self.status_code(), self.to_string())
    }
}

/// Stores `user`'s vote on bot message `message_id` and credits the
/// (user input, bot response) pattern with it.
#[tracing::instrument(name = "Record feedback", skip(pool, user), fields(user_id = %user.id))]
pub async fn record(
    pool: &PgPool,
    message_id: i32,
    user: &models::User,
    kind: FeedbackKind,
) -> Result<MessageFeedback, FeedbackError> {
    let bot_message = db::message::fetch_owned(pool, message_id, &user.id)
        .await
        .map_err(FeedbackError::Database)?
        .ok_or(FeedbackError::MessageNotFound)?;

    if !bot_message.is_bot() {
        return Err(FeedbackError::NotBotMessage);
    }

    let input_id = bot_message
        .linked_message_id
        .ok_or(FeedbackError::NoLinkedInput)?;
    let user_message = db::message::fetch(pool, input_id)
        .await
        .map_err(FeedbackError::Database)?
        .ok_or(FeedbackError::NoLinkedInput)?;

    let (input, response) = ResponsePattern::key(&user_message.content, &bot_message.content);
    let keywords = extract_keywords(&user_message.content);
    let category = categorize(&user_message.content);

    let mut tx = pool.begin().await?;

    let feedback = db::feedback::upsert(&mut *tx, bot_message.id, &user.id, kind)
        .await
        .map_err(FeedbackError::Database)?;

    let mut pattern = db::pattern::register_vote(
        &mut *tx,
        &input,
        &response,
        &keywords,
        category.as_str(),
        kind,
    )
    .await
    .map_err(FeedbackError::Database)?;

    pattern.update_success_rate();
    db::pattern::save_success_rate(&mut *tx, &pattern)
        .await
        .map_err(FeedbackError::Database)?;

    tx.commit().await?;

    tracing::info!(
        "Pattern {} now at {:.2} success rate after {} feedback",
        pattern.id,
        pattern.success_rate,
        kind.as_str()
    );

    refresh_accuracy(pool).await;

    Ok(feedback)
}

/// Share of positive votes, written to the active snapshot. Failures are
/// logged only.
pub async fn refresh_accuracy(pool: &PgPool) {
    let (total, positive) = match db::feedback::totals(pool).await {
        Ok(totals) => totals,
        Err(err) => {
            tracing::error!("Error updating model stats: {}", err);
            return;
        }
    };

    if total == 0 {
        return;
    }

    if let Err(err) = db::snapshot::fetch_or_create_active(pool).await {
        tracing::error!("Error updating model stats: {}", err);
        return;
    }

    let accuracy = positive as f64 / total as f64;
    if let Err(err) = db::snapshot::update_accuracy(pool, accuracy, total).await {
        tracing::error!("Error updating model stats: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_http_statuses() {
        assert_eq!(FeedbackError::MessageNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(FeedbackError::NotBotMessage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(FeedbackError::NoLinkedInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            FeedbackError::Database("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
