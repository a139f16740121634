//! Users Domain
//!
//! Sign-up, sign-in and user management.
//!
//! # Features
//!
//! - User CRUD operations
//! - Password hashing with Argon2
//! - Sign-in by email and password
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Use cases, error classification
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage port (in-memory and PostgreSQL adapters)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User factory, stored user, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod credential;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CustomError, ErrorKind, StorageError, UserResult, ValidationError};
pub use handlers::ApiDoc;
pub use models::{
    AuthenticateUserInput, CreateUserInput, NewUser, UpdateUserInput, User, UserResponse,
    UsersResponse,
};
pub use postgres::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
