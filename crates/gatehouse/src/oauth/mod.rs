// OAuth2 account linking: provider clients, exchange service, HTTP routes

pub mod providers;
pub mod routes;
pub mod service;

pub use providers::{OAuthProvider, ProviderToken};
pub use service::OAuthService;
