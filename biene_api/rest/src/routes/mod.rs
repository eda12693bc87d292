use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiResponse;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:?}");
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Ein interner Serverfehler ist aufgetreten",
    )
}

pub fn error(code: StatusCode, error: &'static str) -> Response {
    (code, Json(ApiResponse::error(error))).into_response()
}

pub fn message(code: StatusCode, message: &'static str) -> Response {
    (code, Json(ApiResponse::message(code.is_success(), message))).into_response()
}

pub async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Route nicht gefunden")
}
