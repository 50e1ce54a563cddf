/// Router-level integration tests
///
/// These exercise the HTTP surface that is decidable before any
/// database access: bearer-token enforcement, request validation, and
/// the error/health envelopes.
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::{access_token, body_json, expired_access_token, refresh_token, TestApp};

fn get_tasks(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/tasks");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_tasks_require_bearer_token() {
    let app = TestApp::new();

    let response = app.call(get_tasks(None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["status"], 401);
    assert_eq!(body["message"], "Token is not found for this request!");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_tasks_reject_garbage_token() {
    let app = TestApp::new();

    let response = app.call(get_tasks(Some("not.a.jwt"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid token!. this token cannot be validated!");
}

#[tokio::test]
async fn test_tasks_reject_expired_token() {
    let app = TestApp::new();

    let token = expired_access_token();
    let response = app.call(get_tasks(Some(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "jwt expired");
}

#[tokio::test]
async fn test_refresh_token_cannot_authenticate_requests() {
    let app = TestApp::new();

    // Signed with the refresh secret, so access validation fails closed
    let token = refresh_token();
    let response = app.call(get_tasks(Some(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_reaches_the_database_layer() {
    let app = TestApp::new();

    // The token passes validation; resolving the user then fails on the
    // unreachable pool, surfacing as a 500 rather than a 401
    let token = access_token();
    let response = app.call(get_tasks(Some(&token))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_login_validates_email_format() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "not-an-email", "password": "whatever" }).to_string(),
        ))
        .unwrap();

    let response = app.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["data"][0]["property"], "email");
    assert_eq!(body["data"][0]["constraints"][0], "email must be an email");
}

#[tokio::test]
async fn test_create_account_rejects_weak_password() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/create-account")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": "user@example.com",
                "password": "weak",
                "confirmPassword": "weak",
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["data"][0]["property"], "password");
    let constraint = body["data"][0]["constraints"][0]
        .as_str()
        .expect("constraint should be a string");
    assert!(constraint.starts_with("password too weak!"));
}

#[tokio::test]
async fn test_create_account_rejects_confirm_mismatch() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/create-account")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": "user@example.com",
                "password": "SecureP@ss1",
                "confirmPassword": "Different1!",
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.call(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["data"][0]["property"], "confirmPassword");
}

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}
