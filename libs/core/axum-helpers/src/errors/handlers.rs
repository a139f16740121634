use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::ErrorResponse;

/// Handler for 404 Not Found errors.
///
/// This can be used as a fallback handler in your router.
pub async fn not_found() -> Response {
    ErrorResponse::new(StatusCode::NOT_FOUND, "route not found").into_response()
}
