use crate::helpers::JsonResponse;
use crate::services::{trainer, Responder};
use actix_web::{get, web, Result};
use sqlx::PgPool;

#[tracing::instrument(name = "Get model statistics.", skip(pg_pool, responder))]
#[get("/stats")]
pub async fn stats_handler(
    pg_pool: web::Data<PgPool>,
    responder: web::Data<Responder>,
) -> Result<impl actix_web::Responder> {
    let performance = trainer::performance(pg_pool.get_ref(), responder.get_ref()).await?;
    Ok(JsonResponse::build().set_item(performance).ok("OK"))
}
