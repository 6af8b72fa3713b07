//! API error type and its JSON response shape.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pchat::{ChatError, ChatErrorKind};
use serde::{Deserialize, Serialize};

pub const INTERNAL_ERROR: &str = "Internal server error";

/// `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400, caller error.
    BadRequest(String),
    /// 500, upstream or internal failure. The message must be safe to expose.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(message) | ApiError::Internal(message) => message,
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        match error.kind {
            ChatErrorKind::InvalidInput => ApiError::BadRequest(error.message),
            ChatErrorKind::RateLimitExhausted | ChatErrorKind::Provider => {
                ApiError::Internal(error.message)
            }
            ChatErrorKind::Store => ApiError::Internal(INTERNAL_ERROR.to_string()),
        }
    }
}
