// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// All data is stored in HashMaps and lost on restart. Providers are seeded
// at construction to mirror the migration seed.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;
use super::AuthStore;

/// In-memory store for dev mode and tests.
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRow>>,
    providers: RwLock<HashMap<Uuid, ProviderRow>>,
    accounts: RwLock<HashMap<Uuid, ProviderAccountRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self {
            users: RwLock::new(HashMap::new()),
            providers: RwLock::new(HashMap::new()),
            accounts: RwLock::new(HashMap::new()),
        };
        // Same reference data the migration seeds
        for name in ["google", "outlook"] {
            let now = Self::now();
            let id = Uuid::now_v7();
            store.providers.write().insert(
                id,
                ProviderRow {
                    id,
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        store
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.read().len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_active_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email && u.active)
            .cloned())
    }

    async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == input.email) {
            return Err(anyhow!("duplicate email: {}", input.email));
        }
        let now = Self::now();
        let row = UserRow {
            id: input.id,
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            active: true,
            created_at: now,
            updated_at: now,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_provider_by_name(&self, name: &str) -> Result<Option<ProviderRow>> {
        Ok(self
            .providers
            .read()
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn upsert_provider_account(
        &self,
        input: CreateProviderAccountRow,
    ) -> Result<ProviderAccountRow> {
        let mut accounts = self.accounts.write();
        let now = Self::now();

        if let Some(existing) = accounts
            .values_mut()
            .find(|a| a.user_id == input.user_id && a.provider_id == input.provider_id)
        {
            existing.access_token = input.access_token;
            existing.refresh_token = input.refresh_token;
            existing.token_expiry = input.token_expiry;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = ProviderAccountRow {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            provider_id: input.provider_id,
            access_token: input.access_token,
            refresh_token: input.refresh_token,
            token_expiry: input.token_expiry,
            is_default: false,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(row.id, row.clone());
        Ok(row)
    }
}
