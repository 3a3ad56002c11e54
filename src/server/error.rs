//! API Error Types
//!
//! Input errors carry their message to the client; upstream and internal
//! failures are logged with full detail server-side and answered with a
//! generic message so nothing internal leaks.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Skill not found or expired")]
    NotFound,

    #[error("Failed to generate skill content")]
    EmptyGeneration,

    #[error("upstream failure: {0}")]
    Upstream(anyhow::Error),

    #[error("internal failure: {0}")]
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::EmptyGeneration => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::Upstream(inner) => {
                error!("Upstream error: {:#}", inner);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(inner) => {
                error!("Internal error: {:#}", inner);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
