use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::ErrorResponse;
use std::error::Error as StdError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The fixed set of failures the HTTP layer knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    InvalidCredentials,
    NotFound,
    InternalServerError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad request",
            ErrorKind::InvalidCredentials => "invalid credentials",
            ErrorKind::NotFound => "not found",
            ErrorKind::InternalServerError => "internal server error",
        }
    }
}

/// A classified use-case failure: a kind, an optional entity label used in
/// the message, and an optional underlying cause that is logged but never
/// sent to clients.
#[derive(Debug, Error)]
#[error("{}", self.message())]
pub struct CustomError {
    kind: ErrorKind,
    entity: Option<&'static str>,
    #[source]
    source: Option<BoxError>,
}

impl CustomError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            entity: None,
            source: None,
        }
    }

    pub fn bad_request(cause: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::BadRequest).with_source(cause)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials)
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self {
            entity: Some(entity),
            ..Self::new(ErrorKind::NotFound)
        }
    }

    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::InternalServerError).with_source(cause)
    }

    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        self.source = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// The message shown to clients.
    pub fn message(&self) -> String {
        match (self.kind, self.entity) {
            (ErrorKind::NotFound, Some(entity)) => format!("{} not found", entity),
            (kind, _) => kind.default_message().to_string(),
        }
    }
}

pub type UserResult<T> = Result<T, CustomError>;

impl IntoResponse for CustomError {
    fn into_response(self) -> Response {
        let status = self.status();

        match (&self.kind, &self.source) {
            (ErrorKind::InternalServerError, Some(cause)) => {
                tracing::error!(error = %cause, "Internal error while handling request");
            }
            (ErrorKind::InternalServerError, None) => {
                tracing::error!("Internal error while handling request");
            }
            (_, Some(cause)) => {
                tracing::debug!(status = status.as_u16(), error = %cause, "Request rejected");
            }
            (_, None) => {}
        }

        let body = ErrorResponse {
            message: self.message(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Rejection raised by the user factory when a required field is empty.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Failures reported by a storage adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                StorageError::Unavailable(err.to_string())
            }
            other => StorageError::Database(other.to_string()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::InternalServerError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_uses_entity() {
        let err = CustomError::not_found("user");
        assert_eq!(err.message(), "user not found");
        assert_eq!(err.to_string(), "user not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_without_entity_uses_default() {
        let err = CustomError::new(ErrorKind::NotFound);
        assert_eq!(err.message(), "not found");
    }

    #[test]
    fn test_display_and_source_from_derive() {
        let err = CustomError::bad_request(ValidationError::EmptyField("name"));
        assert_eq!(err.to_string(), "bad request");
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(
            err.source().unwrap().to_string(),
            "name must not be empty"
        );

        assert!(CustomError::invalid_credentials().source().is_none());
        assert_eq!(
            CustomError::invalid_credentials().to_string(),
            "invalid credentials"
        );
    }

    #[test]
    fn test_message_hides_cause() {
        let err = CustomError::internal(StorageError::Database("relation users missing".into()));
        assert_eq!(err.message(), "internal server error");
        assert!(
            err.source()
                .unwrap()
                .to_string()
                .contains("relation users missing")
        );
    }

    #[test]
    fn test_validation_error_message() {
        assert_eq!(
            ValidationError::EmptyField("email").to_string(),
            "email must not be empty"
        );
    }

    #[tokio::test]
    async fn test_into_response_body_shape() {
        use http_body_util::BodyExt;

        let response = CustomError::not_found("user").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"message": "user not found", "status": 404}));
    }
}
