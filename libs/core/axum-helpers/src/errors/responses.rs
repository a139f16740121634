//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "message": "internal server error",
        "status": 500
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - body could not be decoded or failed validation",
    content_type = "application/json",
    example = json!({
        "message": "request validation failed",
        "status": 400
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - credentials did not match",
    content_type = "application/json",
    example = json!({
        "message": "invalid credentials",
        "status": 401
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "message": "user not found",
        "status": 404
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);
