use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Search chat messages.")]
#[get("/search")]
pub async fn search(
    query: web::Query<forms::SearchQuery>,
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let terms = query.terms().ok_or_else(|| {
        JsonResponse::<views::chat::SearchHit>::build().bad_request(format!(
            "Search query must be at least {} characters long",
            forms::MIN_SEARCH_LEN
        ))
    })?;

    db::message::search(
        pg_pool.get_ref(),
        &user.id,
        terms,
        query.session_id,
        forms::SEARCH_LIMIT,
    )
    .await
    .map(|hits| {
        let hits = hits.into_iter().map(views::chat::SearchHit::from).collect();
        JsonResponse::build().set_list(hits).ok("OK")
    })
    .map_err(|err| JsonResponse::<views::chat::SearchHit>::build().internal_server_error(err))
}
