// API-level tests driving the router over the in-memory store

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use gatehouse::auth;
use gatehouse::config::{JwtConfig, OAuthConfig, OAuthProviderConfig};
use gatehouse::oauth;
use gatehouse::storage::{AuthStore, MemoryStore};

fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn AuthStore> = store.clone();

    let jwt = JwtConfig {
        secret: "test-secret".to_string(),
        token_expiration_hours: 1,
    };
    let tokens = Arc::new(auth::TokenService::new(&jwt));
    let cookie_key = Key::from(&[7u8; 64]);

    let oauth_config = OAuthConfig {
        google: Some(OAuthProviderConfig {
            client_id: "client-123".to_string(),
            client_secret: "shh".to_string(),
            redirect_uri: "http://localhost:8080/v1/oauth/google/callback".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string()],
        }),
        outlook: None,
    };

    let auth_state = auth::routes::AppState::new(dyn_store.clone(), tokens.clone());
    let oauth_service = Arc::new(oauth::OAuthService::new(dyn_store, &oauth_config));
    let oauth_state = oauth::routes::AppState::new(oauth_service, tokens, cookie_key);

    (gatehouse::api_router(auth_state, oauth_state), store)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register_and_login(app: &Router, name: &str, email: &str, password: &str) -> String {
    let (status, _) = post_json(
        app,
        "/v1/auth/register",
        json!({"name": name, "email": email, "password": password}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        app,
        "/v1/auth/login",
        json!({"email": email, "password": password}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_then_login_returns_a_token_with_matching_claims() {
    let (app, _store) = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/auth/register",
        json!({"name": "Ana", "email": "ana@x.com", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "User was created successfully");

    let (status, body) = post_json(
        &app,
        "/v1/auth/login",
        json!({"email": "ana@x.com", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let verifier = auth::TokenService::new(&JwtConfig {
        secret: "test-secret".to_string(),
        token_expiration_hours: 1,
    });
    let claims = verifier.verify(token).unwrap();
    assert_eq!(claims.name, "Ana");
    assert_eq!(claims.email, "ana@x.com");
}

#[tokio::test]
async fn login_failures_share_one_error_shape() {
    let (app, _store) = test_app();

    register_and_login(&app, "Ana", "ana@x.com", "secret123").await;

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/v1/auth/login",
        json!({"email": "ana@x.com", "password": "wrong"}),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/v1/auth/login",
        json!({"email": "nobody@x.com", "password": "secret123"}),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let (app, store) = test_app();

    let body = json!({"name": "Ana", "email": "ana@x.com", "password": "secret123"});
    let (status, _) = post_json(&app, "/v1/auth/register", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = post_json(&app, "/v1/auth/register", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "email already exists");
    assert_eq!(store.user_count(), 1);
}

#[tokio::test]
async fn oauth_endpoints_require_a_bearer_token() {
    let (app, _store) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/oauth/google/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/oauth/google/login")
                .header(header::AUTHORIZATION, "Bearer not-a-valid-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn begin_login_returns_consent_url_and_sets_state_cookie() {
    let (app, _store) = test_app();
    let token = register_and_login(&app, "Ana", "ana@x.com", "secret123").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/oauth/google/login")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("state cookie must be set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("oauth_state="));
    assert!(set_cookie.contains("HttpOnly"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let auth_url = body["auth_url"].as_str().unwrap();
    assert!(auth_url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(auth_url.contains("state="));
    assert!(auth_url.contains("access_type=offline"));
}

#[tokio::test]
async fn callback_rejects_missing_or_mismatched_state() {
    let (app, store) = test_app();
    let token = register_and_login(&app, "Ana", "ana@x.com", "secret123").await;

    // No state cookie at all
    let (status, body) = {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/oauth/google/token")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"code": "auth-code", "state": "whatever"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice::<Value>(&bytes).unwrap())
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing OAuth state");

    // Cookie present but the echoed state does not match
    let begin = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/oauth/google/login")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let cookie = begin
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/oauth/google/token")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"code": "auth-code", "state": "forged-state"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.account_count(), 0);
}

#[tokio::test]
async fn unknown_provider_is_not_found() {
    let (app, _store) = test_app();
    let token = register_and_login(&app, "Ana", "ana@x.com", "secret123").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/oauth/facebook/login")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/oauth/facebook/token")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"code": "auth-code", "state": "whatever"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_bearer_token_is_rejected() {
    let (app, _store) = test_app();

    // Issue a token that is already expired by signing claims directly
    // with the same secret the app verifies against.
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[derive(serde::Serialize)]
    struct ExpiredClaims {
        id: uuid::Uuid,
        name: String,
        email: String,
        exp: i64,
    }

    let expired = encode(
        &Header::default(),
        &ExpiredClaims {
            id: uuid::Uuid::now_v7(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp(),
        },
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/oauth/google/login")
                .header(header::AUTHORIZATION, format!("Bearer {}", expired))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
