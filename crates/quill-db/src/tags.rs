//! Tag repository implementation.
//!
//! Tags are created as a side effect of saving notes (see
//! [`crate::notes::PgNoteRepository`]); this repository only reads the
//! shared set.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use quill_core::{Error, Result, Tag, TagRepository};

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name FROM tag ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let tags = rows
            .into_iter()
            .map(|row| Tag {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect();

        Ok(tags)
    }
}
