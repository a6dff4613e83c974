// Gatehouse API server
// Decision: Storage backend chosen at boot: Postgres when DATABASE_URL is
// set, in-memory otherwise (dev mode)

use anyhow::{Context, Result};
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use gatehouse::auth;
use gatehouse::config::AppConfig;
use gatehouse::oauth;
use gatehouse::openapi::ApiDoc;
use gatehouse::storage::{AuthStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse=debug,tower_http=debug".into()),
        )
        .init();

    tracing::info!("gatehouse starting...");

    let config = AppConfig::from_env();
    tracing::info!(
        google = config.oauth.google.is_some(),
        outlook = config.oauth.outlook.is_some(),
        "OAuth providers configured"
    );

    let store: Arc<dyn AuthStore> = match &config.database_url {
        Some(url) => {
            let store = PgStore::from_url(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let tokens = Arc::new(auth::TokenService::new(&config.jwt));

    // The state cookie is signed with a key derived from the same process
    // secret that signs bearer tokens.
    let digest = Sha512::digest(config.jwt.secret.as_bytes());
    let cookie_key = Key::from(digest.as_slice());

    let auth_state = auth::routes::AppState::new(store.clone(), tokens.clone());
    let oauth_service = Arc::new(oauth::OAuthService::new(store, &config.oauth));
    let oauth_state = oauth::routes::AppState::new(oauth_service, tokens, cookie_key);

    let app = gatehouse::api_router(auth_state, oauth_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
