use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;

/// Errors that can occur while talking to an external service.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Service disabled, unreachable, timed out or answered with a failure status
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    /// Body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ResponseError for ConnectorError {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::ModelUnavailable(_) => "Model unavailable",
            Self::InvalidResponse(_) => "Invalid external service response",
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": message,
            "details": self.to_string(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::ModelUnavailable(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::ModelUnavailable(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::ModelUnavailable(err.to_string())
        }
    }
}
