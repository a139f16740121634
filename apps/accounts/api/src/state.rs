//! Application state shared with the app-level handlers.

use database::postgres::DatabaseConnection;

/// Shared application state.
///
/// Cloning is cheap: the connection pool is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL pool, absent when running on the in-memory store
    pub db: Option<DatabaseConnection>,
}
