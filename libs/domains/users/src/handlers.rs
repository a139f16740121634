use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{CustomError, UserResult};
use crate::models::{
    AuthenticateUserInput, CreateUserInput, UpdateUserInput, UserResponse, UsersResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

const AUTH_TAG: &str = "auth";
const USERS_TAG: &str = "users";

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(sign_up, sign_in, list_users, get_user, update_user, delete_user),
    components(
        schemas(
            CreateUserInput,
            AuthenticateUserInput,
            UpdateUserInput,
            UserResponse,
            UsersResponse
        ),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Sign-up and sign-in"),
        (name = USERS_TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

/// A path id that is not a UUID cannot name a stored user.
fn parse_user_id(raw: &str) -> UserResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| CustomError::not_found("user"))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = AUTH_TAG,
    request_body = CreateUserInput,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_up<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUserInput>,
) -> UserResult<Json<UserResponse>> {
    let user = service.create_user(input).await?;
    Ok(Json(user))
}

/// Check an email/password pair
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = AUTH_TAG,
    request_body = AuthenticateUserInput,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_in<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<AuthenticateUserInput>,
) -> UserResult<Json<UserResponse>> {
    let user = service.authenticate_user(input).await?;
    Ok(Json(user))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = USERS_TAG,
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<UsersResponse>> {
    let users = service.read_all_users().await?;
    Ok(Json(users))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = USERS_TAG,
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let user = service.read_user(parse_user_id(&id)?).await?;
    Ok(Json(user))
}

/// Replace a user's name and email
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = USERS_TAG,
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    request_body = UpdateUserInput,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateUserInput>,
) -> UserResult<StatusCode> {
    service.update_user(parse_user_id(&id)?, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = USERS_TAG,
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<StatusCode> {
    service.destroy_user(parse_user_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
