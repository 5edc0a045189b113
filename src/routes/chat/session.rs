use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::activity;
use crate::views;
use actix_web::{delete, get, put, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

async fn fetch_owned(
    pg_pool: &PgPool,
    id: i32,
    user: &models::User,
) -> Result<models::ChatSession> {
    db::session::fetch_owned(pg_pool, id, &user.id)
        .await
        .map_err(|err| JsonResponse::<models::ChatSession>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<models::ChatSession>::build().not_found("Chat session not found"))
}

#[tracing::instrument(name = "Get chat sessions of a user.")]
#[get("/sessions")]
pub async fn list(
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    db::session::fetch_by_user(pg_pool.get_ref(), &user.id)
        .await
        .map(|sessions| JsonResponse::build().set_list(sessions).ok("OK"))
        .map_err(|err| JsonResponse::<models::ChatSessionSummary>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Get chat session with messages.")]
#[get("/sessions/{id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    let session = fetch_owned(pg_pool.get_ref(), id, &user).await?;

    let messages = db::message::fetch_by_session(pg_pool.get_ref(), session.id)
        .await
        .map_err(|err| JsonResponse::<views::chat::SessionDetail>::build().internal_server_error(err))?;

    Ok(JsonResponse::build()
        .set_id(session.id)
        .set_item(views::chat::SessionDetail::new(session, messages))
        .ok("OK"))
}

#[tracing::instrument(name = "Update chat session.")]
#[put("/sessions/{id}")]
pub async fn update(
    path: web::Path<(i32,)>,
    user: web::ReqData<Arc<models::User>>,
    form: web::Json<forms::UpdateSession>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<models::ChatSession>::build().form_error(errors.to_string()));
    }

    let (id,) = path.into_inner();
    let mut session = fetch_owned(pg_pool.get_ref(), id, &user).await?;
    form.into_inner()
        .update(&mut session)
        .map_err(|err| JsonResponse::<models::ChatSession>::build().form_error(err))?;

    db::session::update(pg_pool.get_ref(), session)
        .await
        .map(|session| JsonResponse::build().set_id(session.id).set_item(session).ok("Updated"))
        .map_err(|err| JsonResponse::<models::ChatSession>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Delete chat session.")]
#[delete("/sessions/{id}")]
pub async fn delete(
    req: HttpRequest,
    path: web::Path<(i32,)>,
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    let session = fetch_owned(pg_pool.get_ref(), id, &user).await?;

    db::session::delete(pg_pool.get_ref(), session.id)
        .await
        .map_err(|err| JsonResponse::<models::ChatSession>::build().internal_server_error(err))?;

    activity::record(pg_pool.get_ref(), &user, "delete_chat_session", &req).await;

    Ok(JsonResponse::<models::ChatSession>::build()
        .set_id(session.id)
        .ok("Chat session deleted"))
}
