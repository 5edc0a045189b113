use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

pub const INITIAL_MODEL_VERSION: &str = "v1.0";

/// Scalar knobs of the response heuristic, stored as JSONB on the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_exploration_rate")]
    pub exploration_rate: f64,
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    #[serde(default = "default_min_samples")]
    pub min_samples_for_pattern: i32,
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_exploration_rate() -> f64 {
    0.2
}

fn default_decay_rate() -> f64 {
    0.95
}

fn default_min_samples() -> i32 {
    3
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            exploration_rate: default_exploration_rate(),
            decay_rate: default_decay_rate(),
            min_samples_for_pattern: default_min_samples(),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ModelSnapshot {
    pub id: i32,
    pub model_version: String,
    pub parameters: Json<ModelParameters>,
    pub training_sessions: i32,
    pub total_feedback_processed: i32,
    pub accuracy_score: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_trained: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_parameters_are_completed_with_defaults() {
        let params: ModelParameters =
            serde_json::from_str(r#"{"exploration_rate": 0.35}"#).unwrap();
        assert_eq!(params.exploration_rate, 0.35);
        assert_eq!(params.min_samples_for_pattern, 3);
        assert_eq!(params.decay_rate, 0.95);
    }
}
