//! JSON extractor with automatic validation using the validator crate.

use crate::errors::ErrorResponse;
use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Any body that cannot be decoded (bad JSON, wrong field types, missing
/// content type) and any body that fails its `validator` rules is rejected
/// with a 400 [`ErrorResponse`].
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct SignIn {
///     #[validate(length(max = 255))]
///     email: String,
///     password: String,
/// }
///
/// async fn sign_in(ValidatedJson(payload): ValidatedJson<SignIn>) -> String {
///     format!("Signing in: {}", payload.email)
/// }
///
/// let app = Router::new().route("/auth/signin", post(sign_in));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(status = e.status().as_u16(), error = %e.body_text(), "Rejected request body");
            ErrorResponse::new(StatusCode::BAD_REQUEST, "invalid request body").into_response()
        })?;

        data.validate().map_err(|e| {
            tracing::debug!(error = %e, "Request validation failed");
            ErrorResponse::new(StatusCode::BAD_REQUEST, "request validation failed")
                .into_response()
        })?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(length(max = 5))]
        name: String,
    }

    async fn echo(ValidatedJson(payload): ValidatedJson<Payload>) -> String {
        payload.name
    }

    async fn send(body: &'static str, content_type: Option<&str>) -> (StatusCode, Vec<u8>) {
        let app = Router::new().route("/", post(echo));

        let mut request = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }

        let response = app
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, body) = send(r#"{"name":"ok"}"#, Some("application/json")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_decode_failures_are_bad_request() {
        for (body, content_type) in [
            ("{not json", Some("application/json")),
            (r#"{"name": 7}"#, Some("application/json")),
            (r#"{"name":"ok"}"#, None),
        ] {
            let (status, bytes) = send(body, content_type).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(
                error,
                ErrorResponse::new(StatusCode::BAD_REQUEST, "invalid request body")
            );
        }
    }

    #[tokio::test]
    async fn test_validation_failure_is_bad_request() {
        let (status, bytes) = send(r#"{"name":"too long"}"#, Some("application/json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.message, "request validation failed");
        assert_eq!(error.status, 400);
    }
}
