// Row types shared by the Postgres and in-memory stores

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A local user account.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user. The caller supplies the id; `active` and the
/// timestamps are store defaults.
#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// An OAuth identity provider (static reference data).
#[derive(Debug, Clone, FromRow)]
pub struct ProviderRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One external-provider identity linked to a local user.
#[derive(Debug, Clone, FromRow)]
pub struct ProviderAccountRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub token_expiry: DateTime<Utc>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for linking a provider account.
#[derive(Debug, Clone)]
pub struct CreateProviderAccountRow {
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub token_expiry: DateTime<Utc>,
}
