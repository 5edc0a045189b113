use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

pub async fn insert(
    pool: &PgPool,
    user_id: &str,
    action: &str,
    ip_address: Option<&str>,
    user_agent: &str,
) -> Result<models::UserActivity, String> {
    let query_span = tracing::info_span!("Saving user activity into the database");
    sqlx::query_as::<_, models::UserActivity>(
        r#"
        INSERT INTO user_activity (user_id, action, ip_address, user_agent, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING id, user_id, action, ip_address, user_agent, created_at
        "#,
    )
    .bind(user_id)
    .bind(action)
    .bind(ip_address)
    .bind(user_agent)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert".to_string()
    })
}
