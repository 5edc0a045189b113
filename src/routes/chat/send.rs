use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::activity;
use crate::services::{chat, Responder};
use crate::views;
use actix_web::{post, web, HttpRequest, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Send chat message.", skip(req, form, pg_pool, responder))]
#[post("")]
pub async fn send_handler(
    req: HttpRequest,
    user: web::ReqData<Arc<models::User>>,
    form: web::Json<forms::SendMessage>,
    pg_pool: web::Data<PgPool>,
    responder: web::Data<Responder>,
) -> Result<impl actix_web::Responder> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<views::chat::Sent>::build().form_error(errors.to_string()));
    }

    let forms::SendMessage { message, session_id } = form.into_inner();
    let exchange = chat::send(
        pg_pool.get_ref(),
        responder.get_ref(),
        &user,
        &message,
        session_id,
    )
    .await?;

    activity::record(pg_pool.get_ref(), &user, "message_sent", &req).await;

    let sent = views::chat::Sent::from(exchange);
    Ok(JsonResponse::build()
        .set_id(sent.bot_message.id)
        .set_item(sent)
        .ok("OK"))
}
