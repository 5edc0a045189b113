use crate::models;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::Instrument;

const SNAPSHOT_COLUMNS: &str = r#"
    id, model_version, parameters, training_sessions, total_feedback_processed,
    accuracy_score, is_active, created_at, last_trained
"#;

pub async fn fetch_active(pool: &PgPool) -> Result<Option<models::ModelSnapshot>, String> {
    let query_span = tracing::info_span!("Fetch active model snapshot.");
    sqlx::query_as::<_, models::ModelSnapshot>(&format!(
        "SELECT {SNAPSHOT_COLUMNS} FROM model_snapshot WHERE is_active LIMIT 1"
    ))
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch model snapshot, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

/// Active snapshot, seeding `v1.0` with default parameters on first use.
pub async fn fetch_or_create_active(pool: &PgPool) -> Result<models::ModelSnapshot, String> {
    if let Some(snapshot) = fetch_active(pool).await? {
        return Ok(snapshot);
    }

    let query_span = tracing::info_span!("Seeding initial model snapshot");
    let inserted = sqlx::query(
        r#"
        INSERT INTO model_snapshot (model_version, parameters, is_active, created_at, last_trained)
        VALUES ($1, $2, TRUE, NOW(), NOW())
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(models::INITIAL_MODEL_VERSION)
    .bind(Json(models::ModelParameters::default()))
    .execute(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert".to_string()
    })?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Created model snapshot {}", models::INITIAL_MODEL_VERSION);
    }

    fetch_active(pool)
        .await?
        .ok_or_else(|| "No active model snapshot".to_string())
}

pub async fn update_accuracy(
    pool: &PgPool,
    accuracy: f64,
    total_feedback: i64,
) -> Result<(), String> {
    let total_feedback = i32::try_from(total_feedback).unwrap_or(i32::MAX);
    sqlx::query(
        r#"
        UPDATE model_snapshot
        SET accuracy_score = $1, total_feedback_processed = $2
        WHERE is_active
        "#,
    )
    .bind(accuracy)
    .bind(total_feedback)
    .execute(pool)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!("Failed to update model accuracy: {:?}", err);
        "Could not update".to_string()
    })
}

/// Stores retrained parameters and counts the session.
pub async fn record_training(
    pool: &PgPool,
    id: i32,
    parameters: &models::ModelParameters,
) -> Result<models::ModelSnapshot, String> {
    let query_span = tracing::info_span!("Saving retrained model parameters");
    sqlx::query_as::<_, models::ModelSnapshot>(&format!(
        r#"
        UPDATE model_snapshot
        SET
            parameters = $2,
            training_sessions = training_sessions + 1,
            last_trained = NOW()
        WHERE id = $1
        RETURNING {SNAPSHOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(Json(parameters.clone()))
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Could not update".to_string()
    })
}
