//! Database library providing PostgreSQL connectors and utilities
//!
//! # Features
//!
//! - `config` - `core_config::FromEnv` support for `PostgresConfig`
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{PostgresConfig, check_health, connect_from_config_with_retry};
//!
//! let db = connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! check_health(&db).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
