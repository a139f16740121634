use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CustomError, UserResult};
use crate::models::{
    AuthenticateUserInput, CreateUserInput, NewUser, NewUserError, UpdateUserInput, User,
    UserResponse, UsersResponse, ensure_not_empty,
};
use crate::repository::UserRepository;

/// Label used in "not found" messages.
const USER: &str = "user";

/// Service layer for User business logic
///
/// Holds no per-request state; the repository is shared behind an `Arc`.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Sign up: validate, hash the password and store the user.
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserInput) -> UserResult<UserResponse> {
        let new_user =
            NewUser::new(input.name, input.email, &input.password).map_err(|e| match e {
                NewUserError::Validation(v) => CustomError::bad_request(v),
                NewUserError::Hash(h) => CustomError::internal(h.to_string()),
            })?;

        let user = self
            .repository
            .create(new_user)
            .await
            .map_err(CustomError::internal)?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user.into())
    }

    /// Sign in with email and password.
    ///
    /// An unknown email is reported before any password comparison happens.
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn authenticate_user(&self, input: AuthenticateUserInput) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_email(&input.email)
            .await
            .map_err(CustomError::internal)?
            .ok_or_else(|| CustomError::not_found(USER))?;

        if !user.check_password(&input.password) {
            tracing::info!(user_id = %user.id, "Rejected sign-in with wrong password");
            return Err(CustomError::invalid_credentials());
        }

        Ok(user.into())
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn read_user(&self, id: Uuid) -> UserResult<UserResponse> {
        Ok(self.find_existing(id).await?.into())
    }

    /// All users, in storage order. No users is an empty list.
    #[instrument(skip(self))]
    pub async fn read_all_users(&self) -> UserResult<UsersResponse> {
        let users = self
            .repository
            .find_all()
            .await
            .map_err(CustomError::internal)?;

        Ok(UsersResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
        })
    }

    /// Replace a user's name and email.
    ///
    /// The user must exist. Both fields must then be non-empty, same as at
    /// sign-up.
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUserInput) -> UserResult<()> {
        let mut user = self.find_existing(id).await?;

        ensure_not_empty("name", &input.name).map_err(CustomError::bad_request)?;
        ensure_not_empty("email", &input.email).map_err(CustomError::bad_request)?;

        user.apply_update(input);

        self.repository
            .update(&user)
            .await
            .map_err(CustomError::internal)?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(())
    }

    /// Delete a user
    #[instrument(skip(self))]
    pub async fn destroy_user(&self, id: Uuid) -> UserResult<()> {
        let user = self.find_existing(id).await?;

        self.repository
            .delete(&user)
            .await
            .map_err(CustomError::internal)?;

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    async fn find_existing(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(CustomError::internal)?
            .ok_or_else(|| CustomError::not_found(USER))
    }
}
