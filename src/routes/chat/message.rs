use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::activity;
use crate::services::{chat, Responder};
use crate::views;
use actix_web::{delete, put, web, HttpRequest, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

/// Rewrites a user message; its old reply is replaced by a new one.
#[tracing::instrument(name = "Edit chat message.", skip(req, form, pg_pool, responder))]
#[put("/messages/{id}")]
pub async fn edit(
    req: HttpRequest,
    path: web::Path<(i32,)>,
    user: web::ReqData<Arc<models::User>>,
    form: web::Json<forms::EditMessage>,
    pg_pool: web::Data<PgPool>,
    responder: web::Data<Responder>,
) -> Result<impl actix_web::Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::chat::Edited>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let revision = chat::edit(
        pg_pool.get_ref(),
        responder.get_ref(),
        &user,
        id,
        &form.new_text,
    )
    .await?;

    activity::record(pg_pool.get_ref(), &user, "edit_message", &req).await;

    Ok(JsonResponse::build()
        .set_id(id)
        .set_item(views::chat::Edited::from(revision))
        .ok("Message updated"))
}

#[tracing::instrument(name = "Delete chat message.", skip(req, pg_pool))]
#[delete("/messages/{id}")]
pub async fn delete(
    req: HttpRequest,
    path: web::Path<(i32,)>,
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl actix_web::Responder> {
    let (id,) = path.into_inner();
    let deleted_ids = chat::delete(pg_pool.get_ref(), &user, id).await?;

    activity::record(pg_pool.get_ref(), &user, "delete_message", &req).await;

    Ok(JsonResponse::build()
        .set_id(id)
        .set_item(views::chat::Deleted { deleted_ids })
        .ok("Message deleted"))
}
