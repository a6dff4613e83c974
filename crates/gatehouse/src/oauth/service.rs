// OAuth exchange service: consent URLs, code exchange, account linking

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::OAuthConfig;
use crate::error::ApiError;
use crate::oauth::providers::{OAuthProvider, ProviderClient, ProviderToken};
use crate::storage::{AuthStore, CreateProviderAccountRow};

pub struct OAuthService {
    store: Arc<dyn AuthStore>,
    clients: HashMap<OAuthProvider, ProviderClient>,
}

impl OAuthService {
    pub fn new(store: Arc<dyn AuthStore>, config: &OAuthConfig) -> Self {
        let mut clients = HashMap::new();
        if let Some(google) = &config.google {
            clients.insert(
                OAuthProvider::Google,
                ProviderClient::new(OAuthProvider::Google, google),
            );
        }
        if let Some(outlook) = &config.outlook {
            clients.insert(
                OAuthProvider::Outlook,
                ProviderClient::new(OAuthProvider::Outlook, outlook),
            );
        }
        Self { store, clients }
    }

    fn client(&self, provider: OAuthProvider) -> Result<&ProviderClient, ApiError> {
        self.clients.get(&provider).ok_or_else(|| {
            ApiError::NotFound(format!("{} OAuth is not configured", provider.as_str()))
        })
    }

    /// Build the provider's consent-page URL embedding the caller's
    /// anti-forgery state.
    pub fn auth_url(&self, provider: OAuthProvider, state: &str) -> Result<String, ApiError> {
        Ok(self.client(provider)?.authorization_url(state))
    }

    /// Exchange the one-time authorization code for provider tokens.
    /// Exchange failures are opaque to the caller; the cause is logged.
    pub async fn handle_callback(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<ProviderToken, ApiError> {
        self.client(provider)?.exchange_code(code).await.map_err(|e| {
            tracing::error!(provider = provider.as_str(), "Code exchange failed: {:#}", e);
            ApiError::Internal("Failed to get token with given code".to_string())
        })
    }

    /// Link the provider tokens to the acting user. Relinking the same
    /// (user, provider) pair replaces the stored token values.
    pub async fn store_account(
        &self,
        user_id: Uuid,
        token: ProviderToken,
        provider_name: &str,
    ) -> Result<(), ApiError> {
        let provider = self
            .store
            .find_provider_by_name(provider_name)
            .await
            .map_err(|e| {
                tracing::error!("Provider lookup failed: {}", e);
                ApiError::Internal("Failed to store user provider account".to_string())
            })?
            .ok_or_else(|| ApiError::NotFound(format!("unknown provider: {}", provider_name)))?;

        self.store
            .upsert_provider_account(CreateProviderAccountRow {
                user_id,
                provider_id: provider.id,
                access_token: token.access_token,
                refresh_token: token.refresh_token,
                token_expiry: token.expires_at,
            })
            .await
            .map_err(|e| {
                tracing::error!("Provider account write failed: {}", e);
                ApiError::Internal("Failed to store user provider account".to_string())
            })?;

        Ok(())
    }
}
