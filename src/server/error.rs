//! The single error type handlers raise; one boundary renders the envelope.

use crate::media_store::MediaStoreError;
use crate::user::auth::TokenError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps duplicate-key store failures to Conflict, everything else to Internal.
    pub fn from_store(err: anyhow::Error, conflict_message: &str) -> Self {
        if crate::sqlite_store::is_unique_violation(&err) {
            ApiError::Conflict(conflict_message.to_owned())
        } else {
            ApiError::Internal(err)
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<MediaStoreError> for ApiError {
    fn from(err: MediaStoreError) -> Self {
        match err {
            MediaStoreError::UnsupportedPayload(kind) => {
                ApiError::Validation(format!("Uploaded file is not a valid {kind}"))
            }
            MediaStoreError::Io(err) => ApiError::Internal(err.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Internal(err) => {
                error!("Internal server error: {:#}", err);
                "Internal server error".to_owned()
            }
            other => other.to_string(),
        };
        let body = json!({
            "success": false,
            "statusCode": status.as_u16(),
            "message": message,
            "data": null,
            "errors": [message],
        });
        (status, Json(body)).into_response()
    }
}
