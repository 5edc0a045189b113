use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::activity;
use crate::services::{trainer, ModelPerformance, Responder};
use actix_web::{post, web, HttpRequest, Result};
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Retrain model.", skip(req, pg_pool, responder))]
#[post("/retrain")]
pub async fn retrain_handler(
    req: HttpRequest,
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
    responder: web::Data<Responder>,
) -> Result<impl actix_web::Responder> {
    if !user.is_admin() {
        return Err(JsonResponse::<ModelPerformance>::build().forbidden("Admin access required"));
    }

    let performance = trainer::retrain(pg_pool.get_ref(), responder.get_ref()).await?;

    activity::record(pg_pool.get_ref(), &user, "model_retrained", &req).await;

    Ok(JsonResponse::build()
        .set_item(performance)
        .ok("Model retrained successfully"))
}
