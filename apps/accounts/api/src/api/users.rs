use axum::Router;
use domain_users::{
    InMemoryUserRepository, PostgresUserRepository, UserService, handlers,
};

/// Users router backed by PostgreSQL when a pool is configured, else in memory.
pub fn router(state: &crate::state::AppState) -> Router {
    match &state.db {
        Some(db) => {
            let repository = PostgresUserRepository::new(db.clone());
            handlers::router(UserService::new(repository))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users are stored in memory and lost on restart");
            handlers::router(UserService::new(InMemoryUserRepository::new()))
        }
    }
}
