//! PostgreSQL storage adapter.
//!
//! Expects an existing table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id            UUID PRIMARY KEY,
//!     name          VARCHAR(255) NOT NULL CHECK (name <> ''),
//!     email         VARCHAR(255) NOT NULL UNIQUE CHECK (email <> ''),
//!     password_hash VARCHAR(255) NOT NULL CHECK (password_hash <> ''),
//!     created_at    TIMESTAMPTZ NOT NULL,
//!     updated_at    TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::models::{NewUser, User};
use crate::repository::UserRepository;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    let message = err.to_string();
    message.contains("duplicate key") || message.contains("unique constraint")
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> StorageResult<User> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $5) RETURNING {USER_COLUMNS}"
        );

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                Uuid::now_v7().into(),
                user.name.into(),
                user.email.clone().into(),
                user.password_hash.into(),
                Utc::now().into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StorageError::DuplicateEmail(user.email.clone())
                } else {
                    StorageError::from(e)
                }
            })?
            .ok_or_else(|| StorageError::Database("INSERT returned no row".to_string()))?;

        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [email.into()]);

        let row = UserRow::find_by_statement(stmt).one(&self.db).await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = UserRow::find_by_statement(stmt).one(&self.db).await?;
        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> StorageResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        let stmt = Statement::from_string(DbBackend::Postgres, sql);

        let rows = UserRow::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        let sql = "UPDATE users SET name = $2, email = $3, updated_at = $4 WHERE id = $1";
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.name.clone().into(),
                user.email.clone().into(),
                user.updated_at.into(),
            ],
        );

        let result = self.db.execute_raw(stmt).await.map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::DuplicateEmail(user.email.clone())
            } else {
                StorageError::from(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Database(format!(
                "no row for user {}",
                user.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, user: &User) -> StorageResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM users WHERE id = $1",
            [user.id.into()],
        );

        let result = self.db.execute_raw(stmt).await?;
        if result.rows_affected() == 0 {
            tracing::debug!(user_id = %user.id, "User row already gone on delete");
        }
        Ok(())
    }
}
