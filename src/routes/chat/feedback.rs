use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::activity;
use crate::services::feedback;
use actix_web::{post, web, HttpRequest, Responder, Result};
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Add message feedback.", skip(req, pg_pool))]
#[post("/feedback")]
pub async fn add(
    req: HttpRequest,
    user: web::ReqData<Arc<models::User>>,
    form: web::Json<forms::Feedback>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let feedback =
        feedback::record(pg_pool.get_ref(), form.message_id, &user, form.feedback_type).await?;

    let action = format!("feedback_{}", feedback.feedback_type.as_str());
    activity::record(pg_pool.get_ref(), &user, &action, &req).await;

    Ok(JsonResponse::build()
        .set_id(feedback.id)
        .set_item(feedback)
        .ok("Feedback recorded"))
}
