//! Handler tests for the users domain
//!
//! These drive the domain router with the in-memory repository and check:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization and status codes
//! - The `{message, status}` error body

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

fn app() -> Router {
    handlers::router(UserService::new(InMemoryUserRepository::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn sign_up(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/auth/signup",
        Some(json!({"name": name, "email": email, "password": password})),
    )
    .await
}

#[tokio::test]
async fn test_sign_up_sign_in_and_lookup_flow() {
    let app = app();

    let (status, created) = sign_up(&app, "test", "test@test.com", "password").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "test");
    assert_eq!(created.as_object().unwrap().len(), 2);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let (status, signed_in) = send(
        &app,
        "POST",
        "/auth/signin",
        Some(json!({"email": "test@test.com", "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(signed_in, created);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/signin",
        Some(json!({"email": "test@test.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "invalid credentials", "status": 401}));

    let (status, body) = send(&app, "GET", &format!("/users/{}", Uuid::now_v7()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "user not found", "status": 404}));

    let (status, body) = send(&app, "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_sign_up_empty_field_is_bad_request() {
    let app = app();

    let (status, body) = sign_up(&app, "", "test@test.com", "password").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "bad request", "status": 400}));

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"users": []}));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/signin",
        Some(json!({"email": "test@test.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_overlong_name_is_bad_request() {
    let app = app();

    let (status, body) = sign_up(&app, &"a".repeat(256), "test@test.com", "password").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_sign_in_unknown_email_is_not_found() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/signin",
        Some(json!({"email": "nobody@test.com", "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "user not found", "status": 404}));
}

#[tokio::test]
async fn test_duplicate_email_is_internal_error() {
    let app = app();

    let (status, _) = sign_up(&app, "one", "test@test.com", "password").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = sign_up(&app, "two", "test@test.com", "password").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "internal server error", "status": 500}));
}

#[tokio::test]
async fn test_list_users_in_creation_order() {
    let app = app();

    let (_, first) = sign_up(&app, "first", "first@test.com", "password").await;
    let (_, second) = sign_up(&app, "second", "second@test.com", "password").await;

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"users": [first, second]}));
}

#[tokio::test]
async fn test_update_user() {
    let app = app();
    let (_, created) = sign_up(&app, "test", "test@test.com", "password").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{}", id),
        Some(json!({"name": "renamed", "email": "renamed@test.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, fetched) = send(&app, "GET", &format!("/users/{}", id), None).await;
    assert_eq!(fetched["name"], "renamed");

    // The password survives a profile update; the email changed.
    let (status, _) = send(
        &app,
        "POST",
        "/auth/signin",
        Some(json!({"email": "renamed@test.com", "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_user_errors() {
    let app = app();
    let (_, created) = sign_up(&app, "test", "test@test.com", "password").await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{}", id),
        Some(json!({"name": "", "email": "renamed@test.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{}", Uuid::now_v7()),
        Some(json!({"name": "renamed", "email": "renamed@test.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");

    // Existence is checked before the fields
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{}", Uuid::now_v7()),
        Some(json!({"name": "", "email": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "user not found", "status": 404}));
}

#[tokio::test]
async fn test_delete_user() {
    let app = app();
    let (_, created) = sign_up(&app, "test", "test@test.com", "password").await;
    let uri = format!("/users/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "user not found", "status": 404}));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = app();

    for method in ["GET", "DELETE"] {
        let (status, body) = send(&app, method, "/users/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "user not found", "status": 404}));
    }
}

#[test]
fn test_openapi_lists_all_paths() {
    use utoipa::OpenApi;

    let doc = ApiDoc::openapi();
    let paths: Vec<&String> = doc.paths.paths.keys().collect();

    for expected in ["/auth/signup", "/auth/signin", "/users", "/users/{id}"] {
        assert!(
            paths.iter().any(|p| p.as_str() == expected),
            "missing {} in {:?}",
            expected,
            paths
        );
    }
}
