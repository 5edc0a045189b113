//! Periodic re-tuning of the model parameters from accumulated feedback.

use crate::db;
use crate::helpers::JsonResponse;
use crate::models::ModelParameters;
use crate::services::response_selector::{Responder, SourceUsageCounts};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use sqlx::PgPool;

/// A pattern at or above this ratio counts as successful in the statistics.
pub const SUCCESSFUL_PATTERN_RATIO: f64 = 0.7;

const HIGH_ACCURACY: f64 = 0.8;
const LOW_ACCURACY: f64 = 0.6;
const MAX_EXPLORATION_RATE: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("{0}")]
    Database(String),
}

impl From<String> for TrainerError {
    fn from(err: String) -> Self {
        TrainerError::Database(err)
    }
}

impl ResponseError for TrainerError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        JsonResponse::<()>::build().http_response(self.status_code(), self.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelPerformance {
    pub model_version: String,
    pub total_patterns: i64,
    pub successful_patterns: i64,
    pub total_feedback: i64,
    pub positive_feedback: i64,
    pub accuracy: f64,
    pub success_rate: f64,
    pub parameters: ModelParameters,
    pub training_sessions: i32,
    pub source_usage: SourceUsageCounts,
}

/// Explore less when users are happy, more (capped) when they are not.
pub fn adjust_exploration_rate(rate: f64, accuracy: f64) -> f64 {
    if accuracy > HIGH_ACCURACY {
        rate * 0.9
    } else if accuracy < LOW_ACCURACY {
        MAX_EXPLORATION_RATE.min(rate * 1.1)
    } else {
        rate
    }
}

pub fn pattern_success_rate(total_patterns: i64, successful_patterns: i64) -> f64 {
    if total_patterns > 0 {
        successful_patterns as f64 / total_patterns as f64
    } else {
        0.0
    }
}

#[tracing::instrument(name = "Model performance", skip(pool, responder))]
pub async fn performance(
    pool: &PgPool,
    responder: &Responder,
) -> Result<ModelPerformance, TrainerError> {
    let snapshot = db::snapshot::fetch_or_create_active(pool).await?;
    let (total_patterns, successful_patterns) =
        db::pattern::totals(pool, SUCCESSFUL_PATTERN_RATIO).await?;
    let (total_feedback, positive_feedback) = db::feedback::totals(pool).await?;

    Ok(ModelPerformance {
        model_version: snapshot.model_version,
        total_patterns,
        successful_patterns,
        total_feedback,
        positive_feedback,
        accuracy: snapshot.accuracy_score,
        success_rate: pattern_success_rate(total_patterns, successful_patterns),
        parameters: snapshot.parameters.0,
        training_sessions: snapshot.training_sessions,
        source_usage: responder.usage(),
    })
}

/// Adjusts the exploration rate of the active snapshot from its accuracy,
/// persists it and hands the new parameters to `responder`.
#[tracing::instrument(name = "Retrain model", skip(pool, responder))]
pub async fn retrain(
    pool: &PgPool,
    responder: &Responder,
) -> Result<ModelPerformance, TrainerError> {
    let snapshot = db::snapshot::fetch_or_create_active(pool).await?;

    let mut parameters = snapshot.parameters.0.clone();
    parameters.exploration_rate =
        adjust_exploration_rate(parameters.exploration_rate, snapshot.accuracy_score);

    let snapshot = db::snapshot::record_training(pool, snapshot.id, &parameters).await?;
    tracing::info!(
        "Model retrained. New exploration rate: {:.3}",
        snapshot.parameters.exploration_rate
    );

    responder.set_parameters(snapshot.parameters.0).await;

    performance(pool, responder).await
}
