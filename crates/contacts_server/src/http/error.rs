//! API error type and its JSON response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contacts_core::ContactServiceError;
use log::error;
use serde_json::json;

const NOT_FOUND_MESSAGE: &str = "Contact not found";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Failure of an API request, rendered as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a caller-facing message.
    BadRequest(String),
    /// 404 "Contact not found".
    NotFound,
    /// 500; details are logged, never returned.
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) => message,
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::Internal => INTERNAL_MESSAGE,
        }
    }
}

impl From<ContactServiceError> for ApiError {
    fn from(value: ContactServiceError) -> Self {
        match value {
            ContactServiceError::Validation(err) => Self::BadRequest(err.to_string()),
            ContactServiceError::ContactNotFound(_) => Self::NotFound,
            other => {
                error!("event=http_error module=http status=error reason={other}");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
