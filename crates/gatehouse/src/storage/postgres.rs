// Postgres store backed by sqlx
// Decision: runtime query_as with explicit column lists, no compile-time macros

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;
use super::AuthStore;

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and apply pending migrations.
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AuthStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_active_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, active, created_at, updated_at
            FROM users
            WHERE email = $1 AND active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, active, created_at, updated_at
            "#,
        )
        .bind(input.id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_provider_by_name(&self, name: &str) -> Result<Option<ProviderRow>> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM providers
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_provider_account(
        &self,
        input: CreateProviderAccountRow,
    ) -> Result<ProviderAccountRow> {
        let row = sqlx::query_as::<_, ProviderAccountRow>(
            r#"
            INSERT INTO provider_accounts
                (id, user_id, provider_id, access_token, refresh_token, token_expiry)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, provider_id) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                token_expiry = EXCLUDED.token_expiry,
                updated_at = now()
            RETURNING id, user_id, provider_id, access_token, refresh_token,
                      token_expiry, is_default, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(input.provider_id)
        .bind(&input.access_token)
        .bind(&input.refresh_token)
        .bind(input.token_expiry)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
