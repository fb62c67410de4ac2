//! Relay errors and their JSON bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use planforge_providers::ProviderError;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The request is missing something or names an unknown provider.
    #[error("{0}")]
    BadRequest(String),

    /// The body is not JSON, is too large, or has the wrong content type.
    #[error("Invalid request body: {0}")]
    Rejected(#[from] JsonRejection),

    /// The vendor answered with a non-2xx status.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// Transport failure or an unreadable vendor reply.
    #[error("Internal proxy error: {0}")]
    Proxy(String),
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        if err.is_client_error() {
            return RelayError::BadRequest(err.to_string());
        }
        match err {
            ProviderError::Upstream {
                status,
                message,
                details,
            } => RelayError::Upstream {
                status,
                message,
                details,
            },
            other => RelayError::Proxy(other.to_string()),
        }
    }
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Rejected(rejection) => rejection.status(),
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::Proxy(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            RelayError::BadRequest(message) => json!({ "error": message }),
            RelayError::Rejected(rejection) => json!({
                "error": "Invalid request body",
                "message": rejection.body_text(),
            }),
            RelayError::Upstream {
                message, details, ..
            } => json!({ "error": message, "details": details }),
            RelayError::Proxy(message) => json!({
                "error": "Internal proxy error",
                "message": message,
            }),
        };
        (status, Json(body)).into_response()
    }
}
