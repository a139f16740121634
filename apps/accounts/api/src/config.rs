use core_config::{AppInfo, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// `None` when `DATABASE_URL` is unset; users are then kept in memory
    pub database: Option<PostgresConfig>,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
        })
    }
}
