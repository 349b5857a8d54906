use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};
use serde::Serialize;

use catalog_core::Outcome;
use catalog_infra::ServiceError;

/// Render an envelope with the given status.
pub fn envelope<T: Serialize>(status: StatusCode, outcome: Outcome<T>) -> Response {
    (status, Json(outcome)).into_response()
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    envelope(status, Outcome::<()>::failure(message))
}

/// Domain failures are the caller's fault (400); sequence/store failures are ours (503).
pub fn service_error_to_response(err: ServiceError) -> Response {
    if err.is_infrastructure() {
        tracing::error!(error = %err, "product operation failed on infrastructure");
        return json_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string());
    }
    json_error(StatusCode::BAD_REQUEST, err.to_string())
}

/// Errors raised by the middleware stack rather than by handlers.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        return json_error(StatusCode::REQUEST_TIMEOUT, "Request timed out.");
    }
    tracing::error!(error = %err, "unhandled middleware error");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Unhandled internal error: {err}"))
}
