use crate::{db, helpers, models};
use actix_web::HttpRequest;
use sqlx::PgPool;

/// Audit trail entry for `action`. Never fails the request.
pub(crate) async fn record(pool: &PgPool, user: &models::User, action: &str, req: &HttpRequest) {
    let ip = helpers::client_ip(req);
    let user_agent = helpers::user_agent(req);

    if let Err(err) = db::activity::insert(pool, &user.id, action, ip.as_deref(), &user_agent).await {
        tracing::error!("Failed to record activity {} for {}: {}", action, user.id, err);
    }
}
