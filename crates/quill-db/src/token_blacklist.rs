//! Refresh-token blacklist repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use quill_core::{Error, Result, TokenBlacklistRepository};

/// PostgreSQL implementation of TokenBlacklistRepository.
pub struct PgTokenBlacklistRepository {
    pool: Pool<Postgres>,
}

impl PgTokenBlacklistRepository {
    /// Create a new PgTokenBlacklistRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenBlacklistRepository for PgTokenBlacklistRepository {
    async fn blacklist(
        &self,
        jti: Uuid,
        user_id: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO refresh_token_blacklist (jti, user_id, blacklisted_at, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(user_id)
        .bind(Utc::now())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        tracing::debug!(
            subsystem = "db",
            component = "token_blacklist",
            op = "blacklist",
            jti = %jti,
            "Refresh token revoked"
        );
        Ok(())
    }

    async fn is_blacklisted(&self, jti: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT 1 AS hit FROM refresh_token_blacklist WHERE jti = $1")
            .bind(jti)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(|r| r.get::<i32, _>("hit") == 1).unwrap_or(false))
    }

    async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_token_blacklist WHERE expires_at < now()")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}
