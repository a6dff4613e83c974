// OAuth account-linking HTTP routes
//
// Flow: begin-login writes the anti-forgery state into a signed cookie and
// returns the consent URL; the callback echoes the state, which must match
// the cookie before the code is exchanged. Both endpoints require a valid
// bearer token: linking is only reachable by authenticated users.

use axum::extract::{FromRef, Path, State};
use axum::{
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::jwt::TokenService;
use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ErrorResponse};
use crate::oauth::providers::OAuthProvider;
use crate::oauth::service::OAuthService;

const STATE_COOKIE: &str = "oauth_state";

/// Begin-login response carrying the provider's consent-page URL
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Callback request: the code returned by the provider plus the echoed state
#[derive(Debug, Deserialize, ToSchema)]
pub struct CallbackRequest {
    pub code: String,
    pub state: String,
}

/// Callback response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// App state for oauth routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OAuthService>,
    pub tokens: Arc<TokenService>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(service: Arc<OAuthService>, tokens: Arc<TokenService>, cookie_key: Key) -> Self {
        Self {
            service,
            tokens,
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Create oauth routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/oauth/:provider/login", get(begin_login))
        .route("/v1/oauth/:provider/token", post(callback))
        .with_state(state)
}

fn parse_provider(name: &str) -> Result<OAuthProvider, ApiError> {
    OAuthProvider::from_str(name)
        .ok_or_else(|| ApiError::NotFound(format!("unknown oauth provider: {}", name)))
}

/// GET /v1/oauth/:provider/login - Begin the linking flow
#[utoipa::path(
    get,
    path = "/v1/oauth/{provider}/login",
    params(("provider" = String, Path, description = "Provider name (google, outlook)")),
    responses(
        (status = 200, description = "Consent-page URL", body = AuthUrlResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "Unknown provider", body = ErrorResponse)
    ),
    tag = "oauth"
)]
pub async fn begin_login(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(provider): Path<String>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<AuthUrlResponse>), ApiError> {
    let provider = parse_provider(&provider)?;

    let oauth_state = Uuid::now_v7().to_string();
    let auth_url = state.service.auth_url(provider, &oauth_state)?;

    let cookie = Cookie::build((STATE_COOKIE, oauth_state))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Json(AuthUrlResponse { auth_url })))
}

/// POST /v1/oauth/:provider/token - Exchange the callback code and link the account
#[utoipa::path(
    post,
    path = "/v1/oauth/{provider}/token",
    params(("provider" = String, Path, description = "Provider name (google, outlook)")),
    request_body = CallbackRequest,
    responses(
        (status = 200, description = "Account linked", body = MessageResponse),
        (status = 401, description = "Missing/invalid bearer token or state mismatch", body = ErrorResponse),
        (status = 404, description = "Unknown provider", body = ErrorResponse),
        (status = 500, description = "Code exchange or persistence failed", body = ErrorResponse)
    ),
    tag = "oauth"
)]
pub async fn callback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(provider): Path<String>,
    jar: SignedCookieJar,
    Json(req): Json<CallbackRequest>,
) -> Result<(SignedCookieJar, Json<MessageResponse>), ApiError> {
    let provider = parse_provider(&provider)?;

    // The state is single-use: it must match the value stored at begin-login
    // and the cookie is cleared as soon as it has been checked.
    let expected = jar
        .get(STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Missing OAuth state".to_string()))?;
    if expected != req.state {
        tracing::warn!(
            provider = provider.as_str(),
            "OAuth state mismatch on callback"
        );
        return Err(ApiError::Unauthorized("Invalid OAuth state".to_string()));
    }
    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));

    let token = state.service.handle_callback(provider, &req.code).await?;
    state
        .service
        .store_account(user.id, token, provider.as_str())
        .await?;

    Ok((
        jar,
        Json(MessageResponse {
            message: format!("Successfully linked {} account", provider.display_name()),
        }),
    ))
}
