// Bearer-token extractor for protected routes
//
// Verification failures (bad signature, expired, malformed) all surface as
// the same generic Unauthorized response.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::TokenService;
use crate::error::ApiError;

/// Authenticated user context extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let claims = tokens.verify(token).map_err(|e| {
            tracing::debug!("Token validation failed: {}", e);
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(AuthUser {
            id: claims.id,
            name: claims.name,
            email: claims.email,
        })
    }
}
