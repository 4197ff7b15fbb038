//! API error handling utilities.

use crate::storage::MutationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{error, warn};

/// API error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Structured error body, e.g. the field errors of a validation failure
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

/// HTTP status for each mutation error kind.
pub fn status_for(err: &MutationError) -> StatusCode {
    match err {
        MutationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MutationError::Conflict { .. } => StatusCode::CONFLICT,
        MutationError::NotFound { .. } => StatusCode::NOT_FOUND,
        MutationError::Rejected { .. } => StatusCode::BAD_REQUEST,
        MutationError::Transport { .. } => StatusCode::BAD_GATEWAY,
        MutationError::Schema { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        let status = status_for(&err);
        match &err {
            MutationError::Schema { .. } => error!("Schema error from commerce API: {}", err),
            MutationError::Transport { .. } => warn!("Commerce API unreachable: {}", err),
            _ => {}
        }
        let mut api_error = Self::new(status, err.to_string());
        api_error.details = serde_json::to_value(&err).ok();
        api_error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message,
            "status": self.status.as_u16(),
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }

        (self.status, axum::Json(body)).into_response()
    }
}
