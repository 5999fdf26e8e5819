//! Integration tests for registration, login, refresh, and the
//! authenticated-account endpoint. Require a running PostgreSQL instance
//! (see `TEST_DATABASE_URL`).

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_register_returns_admin_with_tokens() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let email = unique_test_email();
    let request = json_request(
        Method::POST,
        "/api/v1/auth/register",
        json!({
            "name": "Bootstrap Admin",
            "email": email,
            "password": "SecureP@ss123!"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"]["dormitory_id"].is_null());
    assert!(body["tokens"]["access_token"].is_string());
    assert!(body["tokens"]["refresh_token"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let admin = register_admin(&app).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/register",
        json!({
            "name": "Second Admin",
            "email": admin.email,
            "password": "SecureP@ss123!"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_login_with_wrong_password_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let admin = register_admin(&app).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({ "email": admin.email, "password": "not-the-password" }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn test_refresh_issues_new_token_pair() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let admin = register_admin(&app).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": admin.refresh_token }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn test_me_returns_authenticated_account() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let admin = register_admin(&app).await;

    let request = get_request_with_auth("/api/v1/auth/me", &admin.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["id"], admin.user_id.as_str());
    assert_eq!(body["email"], admin.email);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/v1/users")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
