// OAuth2 provider definitions and the authorization-code exchange
// Decision: Manual OAuth2 implementation over reqwest; the provider set is
// a closed enum so unknown names are rejected before any URL is built

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::config::OAuthProviderConfig;

/// Closed set of supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Outlook,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Outlook => "outlook",
        }
    }

    /// Human-readable name for response messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::Outlook => "Outlook",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "google" => Some(OAuthProvider::Google),
            "outlook" => Some(OAuthProvider::Outlook),
            _ => None,
        }
    }

    fn authorize_endpoint(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            OAuthProvider::Outlook => {
                "https://login.microsoftonline.com/common/oauth2/v2.0/authorize"
            }
        }
    }

    fn token_endpoint(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://oauth2.googleapis.com/token",
            OAuthProvider::Outlook => "https://login.microsoftonline.com/common/oauth2/v2.0/token",
        }
    }
}

/// Access and refresh tokens returned by a provider's token endpoint.
#[derive(Debug, Clone)]
pub struct ProviderToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Client for one configured provider.
pub struct ProviderClient {
    provider: OAuthProvider,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: Vec<String>,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new(provider: OAuthProvider, config: &OAuthProviderConfig) -> Self {
        Self {
            provider,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Build the consent-page URL embedding the anti-forgery state and
    /// requesting offline access.
    pub fn authorization_url(&self, state: &str) -> String {
        let scope = self.scopes.join(" ");
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", state),
        ];
        // Google hands out refresh tokens through access_type; Microsoft
        // through the offline_access scope carried in config
        if self.provider == OAuthProvider::Google {
            params.push(("access_type", "offline"));
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.provider.authorize_endpoint(), query)
    }

    /// Exchange a one-time authorization code for provider tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<ProviderToken> {
        let response: TokenResponse = self
            .http
            .post(self.provider.token_endpoint())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("Token endpoint unreachable")?
            .error_for_status()
            .context("Token endpoint rejected the authorization code")?
            .json()
            .await
            .context("Failed to parse token response")?;

        let expires_in = response.expires_in.unwrap_or(3600);

        Ok(ProviderToken {
            access_token: response.access_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(scopes: &[&str]) -> OAuthProviderConfig {
        OAuthProviderConfig {
            client_id: "client-123".to_string(),
            client_secret: "shh".to_string(),
            redirect_uri: "http://localhost:8080/v1/oauth/google/callback".to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn provider_names_round_trip() {
        assert_eq!(
            OAuthProvider::from_str("google"),
            Some(OAuthProvider::Google)
        );
        assert_eq!(
            OAuthProvider::from_str("GOOGLE"),
            Some(OAuthProvider::Google)
        );
        assert_eq!(
            OAuthProvider::from_str("outlook"),
            Some(OAuthProvider::Outlook)
        );
        assert_eq!(OAuthProvider::from_str("facebook"), None);

        assert_eq!(OAuthProvider::Google.as_str(), "google");
        assert_eq!(OAuthProvider::Outlook.as_str(), "outlook");
    }

    #[test]
    fn google_url_embeds_state_and_offline_access() {
        let client = ProviderClient::new(
            OAuthProvider::Google,
            &config(&["openid", "email", "profile"]),
        );
        let url = client.authorization_url("state-abc");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fv1%2Foauth%2Fgoogle%2Fcallback"
        ));
    }

    #[test]
    fn outlook_url_uses_offline_access_scope() {
        let client = ProviderClient::new(
            OAuthProvider::Outlook,
            &config(&["openid", "email", "offline_access"]),
        );
        let url = client.authorization_url("state-xyz");

        assert!(url.starts_with("https://login.microsoftonline.com/common/oauth2/v2.0/authorize?"));
        assert!(url.contains("state=state-xyz"));
        assert!(url.contains("offline_access"));
        assert!(!url.contains("access_type"));
    }
}
