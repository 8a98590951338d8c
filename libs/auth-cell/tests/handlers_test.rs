use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::router::auth_routes;
use shared_config::AppConfig;
use shared_utils::jwt::validate_token;
use shared_utils::password::hash_password;
use shared_utils::test_utils::{JwtTestUtils, MockTableResponses, TestConfig, TestUser};

fn test_app(mock_server: &MockServer) -> (Router, AppConfig) {
    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    (auth_routes(Arc::new(config.clone())), config)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn register_issues_a_valid_token() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);
    let user_id = Uuid::new_v4().to_string();

    // No account with this email yet.
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockTableResponses::user_row(&user_id, "new@example.com", "irrelevant-hash")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(post_json(
            "/register",
            json!({"email": "new@example.com", "password": "secret1", "name": "New User"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["access_token"].as_str().unwrap();
    let claims = validate_token(token, &config.supabase_jwt_secret).unwrap();
    assert_eq!(claims.id, user_id);
}

#[tokio::test]
async fn register_rejects_taken_email() {
    let mock_server = MockServer::start().await;
    let (app, _config) = test_app(&mock_server);
    let user_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::user_row(&user_id, "taken@example.com", "hash")
        ])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(post_json(
            "/register",
            json!({"email": "taken@example.com", "password": "secret1", "name": "Someone"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let mock_server = MockServer::start().await;
    let (app, _config) = test_app(&mock_server);

    let response = app
        .oneshot(post_json(
            "/register",
            json!({"email": "a@example.com", "password": "short", "name": "A"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_succeeds_with_correct_password() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);
    let user_id = Uuid::new_v4().to_string();
    let hash = hash_password("demo123").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::user_row(&user_id, "demo@example.com", &hash)
        ])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(post_json(
            "/login",
            json!({"email": "demo@example.com", "password": "demo123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["access_token"].as_str().unwrap();
    assert!(validate_token(token, &config.supabase_jwt_secret).is_ok());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let mock_server = MockServer::start().await;
    let (app, _config) = test_app(&mock_server);
    let user_id = Uuid::new_v4().to_string();
    let hash = hash_password("demo123").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::user_row(&user_id, "demo@example.com", &hash)
        ])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(post_json(
            "/login",
            json!({"email": "demo@example.com", "password": "not-the-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let mock_server = MockServer::start().await;
    let (app, _config) = test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app
        .oneshot(post_json(
            "/login",
            json!({"email": "ghost@example.com", "password": "whatever"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_requires_a_token() {
    let mock_server = MockServer::start().await;
    let (app, _config) = test_app(&mock_server);

    let request = Request::builder()
        .method("GET")
        .uri("/me")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_omits_the_password_hash() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);
    let user = TestUser::default();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::user_row(&user.id, &user.email, "stored-hash")
        ])))
        .mount(&mock_server)
        .await;

    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, None);
    let request = Request::builder()
        .method("GET")
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], user.email);
    assert!(body["user"].get("password").is_none());
}
