// Authentication service: registration and login
//
// Login failures are deliberately indistinguishable: unknown emails and
// wrong passwords both produce the same generic Unauthorized response.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::{Identity, TokenService};
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::storage::{AuthStore, CreateUserRow};

/// Message returned for every failed login, regardless of cause.
const LOGIN_FAILED: &str = "Authentication failed, check your email and password and try again";

pub struct AuthService {
    store: Arc<dyn AuthStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn AuthStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Register a new user. Fails with `Conflict` when the email already
    /// resolves to a user, active or not. The active flag and timestamps
    /// are left to store defaults.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let existing = self.store.find_user_by_email(email).await.map_err(|e| {
            tracing::error!("User lookup failed during registration: {}", e);
            ApiError::Internal("Registration failed".to_string())
        })?;

        if existing.is_some() {
            return Err(ApiError::Conflict("email already exists".to_string()));
        }

        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })?;

        self.store
            .create_user(CreateUserRow {
                id: Uuid::now_v7(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| {
                tracing::error!("User creation failed: {}", e);
                ApiError::Internal("Registration failed".to_string())
            })?;

        Ok(())
    }

    /// Authenticate with email and password and issue a signed token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let identity = self
            .authenticate(email, password)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(LOGIN_FAILED.to_string()))?;

        self.tokens.issue(&identity).map_err(|e| {
            tracing::error!("Token issuance failed: {}", e);
            ApiError::Internal("Login failed".to_string())
        })
    }

    /// Check credentials against the store. Returns the identity on success,
    /// None for any credential failure.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, ApiError> {
        let user = match self.store.find_active_user_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!(email, "User not found: authentication failed");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!("User lookup failed during login: {}", e);
                return Err(ApiError::Internal("Login failed".to_string()));
            }
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(Some(Identity {
                id: user.id,
                name: user.name,
                email: user.email,
            })),
            Ok(false) => {
                tracing::info!(email, "Authentication failed");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Stored password hash rejected: {}", e);
                Ok(None)
            }
        }
    }
}
