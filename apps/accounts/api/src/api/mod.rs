use axum::Router;

pub mod health;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Returns a stateless Router (sub-routers have their state applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest("/v1", users::router(state))
}

/// Creates a router with the /ready endpoint.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
