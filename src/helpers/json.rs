use actix_web::error::{Error, InternalError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_derive::Serialize;

/// Envelope shared by every JSON endpoint.
#[derive(Serialize, Debug)]
pub struct JsonResponse<T> {
    pub status: String,
    pub message: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<T>>,
}

pub struct JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    id: Option<i32>,
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    pub fn set_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    fn into_response<M: Into<String>>(self, code: StatusCode, message: M) -> JsonResponse<T> {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.canonical_reason().unwrap_or("Unknown").to_string()
        } else {
            message
        };

        JsonResponse {
            status: if code.is_success() { "OK" } else { "Error" }.to_string(),
            message,
            code: code.as_u16(),
            id: self.id,
            item: self.item,
            list: self.list,
        }
    }

    pub fn ok<M: Into<String>>(self, message: M) -> web::Json<JsonResponse<T>> {
        web::Json(self.into_response(StatusCode::OK, message))
    }

    /// The envelope as a finished response with status `code`.
    pub fn http_response<M: Into<String>>(self, code: StatusCode, message: M) -> HttpResponse {
        HttpResponse::build(code).json(self.into_response(code, message))
    }

    fn error<M: Into<String>>(self, code: StatusCode, message: M) -> Error {
        let body = self.into_response(code, message);
        let cause = body.message.clone();
        InternalError::from_response(cause, HttpResponse::build(code).json(body)).into()
    }

    pub fn bad_request<M: Into<String>>(self, message: M) -> Error {
        self.error(StatusCode::BAD_REQUEST, message)
    }

    pub fn form_error<M: Into<String>>(self, message: M) -> Error {
        self.error(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized<M: Into<String>>(self, message: M) -> Error {
        self.error(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden<M: Into<String>>(self, message: M) -> Error {
        self.error(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found<M: Into<String>>(self, message: M) -> Error {
        self.error(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error<M: Into<String>>(self, message: M) -> Error {
        self.error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            id: None,
            item: None,
            list: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_skips_empty_fields() {
        let web::Json(body) = JsonResponse::<String>::build().set_id(7).ok("Saved");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["status"], "OK");
        assert_eq!(value["code"], 200);
        assert_eq!(value["id"], 7);
        assert_eq!(value["message"], "Saved");
        assert!(value.get("item").is_none());
        assert!(value.get("list").is_none());
    }

    #[test]
    fn blank_message_uses_reason_phrase() {
        let web::Json(body) = JsonResponse::<String>::build().ok("  ");
        assert_eq!(body.message, "OK");
    }

    #[test]
    fn errors_carry_their_status() {
        let err = JsonResponse::<String>::build().not_found("missing");
        assert_eq!(err.as_response_error().status_code(), StatusCode::NOT_FOUND);

        let err = JsonResponse::<String>::build().forbidden("");
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
    }
}
