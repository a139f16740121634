use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, parse_allowed_origins, security_headers};
use axum::{Router, http::HeaderValue, middleware};
use core_config::{env_optional, server::ServerConfig};
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - Swagger UI at `/swagger-ui`, serving `/api-docs/openapi.json`
/// - API routes nested under `/api`
/// - Common middleware (tracing, security headers, CORS, compression)
/// - JSON 404 fallback handler
///
/// Health endpoints (/health, /ready) are added by the app with
/// `health_router()` and its own ready handler.
///
/// # CORS Configuration
///
/// `CORS_ALLOWED_ORIGIN` holds comma-separated allowed origins, e.g.
/// `CORS_ALLOWED_ORIGIN=http://localhost:3000,https://example.com`.
/// When it is unset, no cross-origin access is granted.
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` contains an invalid value.
pub async fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let origins = allowed_origins_from_env()?;
    Ok(create_router_with_cors::<T>(apis, create_cors_layer(origins)))
}

/// Reads `CORS_ALLOWED_ORIGIN`. Unset or blank means no allowed origins.
fn allowed_origins_from_env() -> io::Result<Vec<HeaderValue>> {
    match env_optional("CORS_ALLOWED_ORIGIN") {
        Some(value) => {
            let origins = parse_allowed_origins(&value)?;
            info!("CORS configured with allowed origins: {}", value);
            Ok(origins)
        }
        None => {
            info!("CORS_ALLOWED_ORIGIN not set, cross-origin requests are not allowed");
            Ok(Vec::new())
        }
    }
}

/// Same as [`create_router`] with an explicit CORS layer.
pub fn create_router_with_cors<T>(apis: Router, cors_layer: CorsLayer) -> Router
where
    T: OpenApi + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        // Compresses responses based on the Accept-Encoding header
        .layer(CompressionLayer::new())
}

/// Production-ready server with coordinated shutdown and cleanup.
///
/// This provides:
/// - Graceful shutdown on SIGINT/SIGTERM
/// - A cleanup future that runs once shutdown starts, bounded by `shutdown_timeout`
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::create_production_app;
///
/// let cleanup = async move {
///     db.close().await.ok();
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        if shutdown_rx.recv().await.is_err() {
            return;
        }

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let signal_coordinator = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_coordinator.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // Unblocks cleanup when the server stopped for a reason other than a signal
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn app() -> Router {
        let apis = Router::new().route("/v1/ping", get(|| async { "pong" }));
        create_router_with_cors::<TestDoc>(apis, create_cors_layer(Vec::new()))
    }

    async fn get_path(path: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_routes_nested_under_api() {
        let (status, body) = get_path("/api/v1/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = get_path("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "route not found", "status": 404}));
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let (status, body) = get_path("/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["info"]["title"], "test");
    }

    #[test]
    fn test_allowed_origins_from_env() {
        temp_env::with_var("CORS_ALLOWED_ORIGIN", None::<&str>, || {
            assert!(allowed_origins_from_env().unwrap().is_empty());
        });

        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("   "), || {
            assert!(allowed_origins_from_env().unwrap().is_empty());
        });

        temp_env::with_var(
            "CORS_ALLOWED_ORIGIN",
            Some("http://localhost:3000,https://example.com"),
            || {
                assert_eq!(
                    allowed_origins_from_env().unwrap(),
                    vec![
                        HeaderValue::from_static("http://localhost:3000"),
                        HeaderValue::from_static("https://example.com"),
                    ]
                );
            },
        );

        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("bad\nvalue"), || {
            assert!(allowed_origins_from_env().is_err());
        });
    }
}
