use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::credential;
use crate::error::ValidationError;

/// A user that passed the factory checks but has not been stored yet.
///
/// Storage assigns the id and timestamps when it turns this into a [`User`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Why [`NewUser::new`] refused to build a user.
#[derive(Debug, thiserror::Error)]
pub enum NewUserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

impl NewUser {
    /// Validate the fields and hash the password.
    ///
    /// Empty fields are rejected before any hashing happens.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, NewUserError> {
        let name = name.into();
        let email = email.into();

        ensure_not_empty("name", &name)?;
        ensure_not_empty("email", &email)?;
        ensure_not_empty("password", password)?;

        let password_hash = credential::hash(password).map_err(NewUserError::Hash)?;

        Ok(Self {
            name,
            email,
            password_hash,
        })
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        credential::verify(candidate, &self.password_hash)
    }
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 hash, never the plaintext.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Materialize a stored user from a factory-built one.
    pub fn from_new(id: Uuid, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        credential::verify(candidate, &self.password_hash)
    }

    /// Overwrite the profile fields. The password is left untouched.
    pub fn apply_update(&mut self, input: UpdateUserInput) {
        self.name = input.name;
        self.email = input.email;
        self.updated_at = Utc::now();
    }
}

pub(crate) fn ensure_not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Public projection of a user: id and name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// All users, in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

/// Sign-up payload.
///
/// Length limits follow the 255-character width of the `users` columns.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserInput {
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Sign-in payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthenticateUserInput {
    #[validate(length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Profile update payload. Both fields are replaced.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserInput {
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub email: String,
}
