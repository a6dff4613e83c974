// Storage layer for the identity service
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// The service layer only sees the `AuthStore` trait, so storage engines are
// swappable and tests inject the in-memory implementation.

pub mod memory;
pub mod models;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use models::*;
pub use postgres::PgStore;

/// Capability interface over user and provider persistence.
/// All operations are keyed point reads or single-row writes.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Look up a user by email regardless of the active flag.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>>;

    /// Look up a user by email, matching active users only.
    async fn find_active_user_by_email(&self, email: &str) -> Result<Option<UserRow>>;

    /// Persist a new user. Fails on duplicate email.
    async fn create_user(&self, input: CreateUserRow) -> Result<UserRow>;

    /// Resolve a provider record by its well-known name.
    async fn find_provider_by_name(&self, name: &str) -> Result<Option<ProviderRow>>;

    /// Link a provider account, replacing the stored token values if the
    /// (user, provider) pair is already linked.
    async fn upsert_provider_account(
        &self,
        input: CreateProviderAccountRow,
    ) -> Result<ProviderAccountRow>;
}
