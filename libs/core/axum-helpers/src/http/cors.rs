use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates a CORS layer with common settings for API services.
///
/// An empty origin list yields a layer that grants no cross-origin access.
///
/// # Returns
/// A configured `CorsLayer` with:
/// - Specified allowed origins
/// - The methods the API uses (GET, POST, PUT, DELETE, OPTIONS)
/// - Content-Type and Accept headers
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Parses a comma-separated origin list such as
/// `http://localhost:3000,https://example.com`.
///
/// Blank entries are skipped.
pub fn parse_allowed_origins(origins: &str) -> io::Result<Vec<HeaderValue>> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid CORS_ALLOWED_ORIGIN value '{}': {}", s, e),
                )
            })
        })
        .collect()
}
