//! Success envelope helpers. The failure side lives in [`super::error`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

fn envelope<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (
        status,
        Json(json!({
            "success": true,
            "statusCode": status.as_u16(),
            "message": message,
            "data": data,
        })),
    )
        .into_response()
}

pub(crate) fn ok<T: Serialize>(message: &str, data: T) -> Response {
    envelope(StatusCode::OK, message, data)
}

pub(crate) fn created<T: Serialize>(message: &str, data: T) -> Response {
    envelope(StatusCode::CREATED, message, data)
}
