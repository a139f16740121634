use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = match config.database.clone() {
        Some(database) => {
            let db = database::postgres::connect_from_config_with_retry(database, None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
            Some(db)
        }
        None => None,
    };

    let state = AppState { config, db };

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    // - /health: liveness with app name/version
    // - /ready: readiness, pings PostgreSQL when configured
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    let server = state.config.server.clone();
    info!(
        "Starting accounts API ({:?} shutdown timeout)",
        server.shutdown_timeout
    );

    create_production_app(app, &server, server.shutdown_timeout, async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Accounts API shutdown complete");
    Ok(())
}
