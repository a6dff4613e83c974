// Application configuration loaded from environment variables.
// Decision: AUTH_ prefix for auth settings
// Decision: OAuth providers are optional and enabled by the presence of
// their client credentials

use rand::Rng;

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens (and, derived, the state cookie).
    pub secret: String,
    /// Token validity window in hours.
    pub token_expiration_hours: i64,
}

/// Credentials and settings for one OAuth provider.
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// OAuth configuration for all supported providers.
#[derive(Debug, Clone, Default)]
pub struct OAuthConfig {
    pub google: Option<OAuthProviderConfig>,
    pub outlook: Option<OAuthProviderConfig>,
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub oauth: OAuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let base_url = std::env::var("BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let secret = std::env::var("AUTH_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "AUTH_JWT_SECRET not set, generating a random secret (issued tokens will not survive a restart)"
            );
            let bytes: [u8; 32] = rand::thread_rng().gen();
            hex::encode(bytes)
        });

        let token_expiration_hours = std::env::var("AUTH_TOKEN_EXPIRATION_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(72);

        let oauth = OAuthConfig {
            google: provider_from_env("GOOGLE", &base_url, &["openid", "email", "profile"]),
            // Microsoft grants refresh tokens through the offline_access scope
            outlook: provider_from_env(
                "OUTLOOK",
                &base_url,
                &["openid", "email", "profile", "offline_access"],
            ),
        };

        Self {
            port,
            database_url,
            jwt: JwtConfig {
                secret,
                token_expiration_hours,
            },
            oauth,
        }
    }
}

/// Read one provider's configuration; returns None unless both client id and
/// secret are present.
fn provider_from_env(
    name: &str,
    base_url: &str,
    default_scopes: &[&str],
) -> Option<OAuthProviderConfig> {
    let client_id = std::env::var(format!("AUTH_{}_CLIENT_ID", name))
        .ok()
        .filter(|s| !s.is_empty())?;
    let client_secret = std::env::var(format!("AUTH_{}_CLIENT_SECRET", name))
        .ok()
        .filter(|s| !s.is_empty())?;

    let redirect_uri = std::env::var(format!("AUTH_{}_REDIRECT_URI", name)).unwrap_or_else(|_| {
        format!("{}/v1/oauth/{}/callback", base_url, name.to_lowercase())
    });

    let scopes = parse_scopes(
        std::env::var(format!("AUTH_{}_SCOPES", name)).ok(),
        default_scopes,
    );

    Some(OAuthProviderConfig {
        client_id,
        client_secret,
        redirect_uri,
        scopes,
    })
}

/// Parse a comma-separated scope list, falling back to defaults.
fn parse_scopes(raw: Option<String>, defaults: &[&str]) -> Vec<String> {
    match raw {
        Some(s) if !s.trim().is_empty() => s
            .split(',')
            .map(|scope| scope.trim().to_string())
            .filter(|scope| !scope.is_empty())
            .collect(),
        _ => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_fall_back_to_defaults() {
        let scopes = parse_scopes(None, &["openid", "email"]);
        assert_eq!(scopes, vec!["openid", "email"]);

        let scopes = parse_scopes(Some("  ".to_string()), &["openid"]);
        assert_eq!(scopes, vec!["openid"]);
    }

    #[test]
    fn scopes_are_split_and_trimmed() {
        let scopes = parse_scopes(
            Some("openid, email ,https://mail.google.com/".to_string()),
            &["ignored"],
        );
        assert_eq!(scopes, vec!["openid", "email", "https://mail.google.com/"]);
    }

    #[test]
    fn oauth_config_defaults_to_no_providers() {
        let config = OAuthConfig::default();
        assert!(config.google.is_none());
        assert!(config.outlook.is_none());
    }
}
