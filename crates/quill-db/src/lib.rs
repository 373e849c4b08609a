//! # quill-db
//!
//! PostgreSQL database layer for quill.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, profiles, notes, tags, and the
//!   refresh-token blacklist
//!
//! ## Example
//!
//! ```rust,ignore
//! use quill_db::Database;
//! use quill_core::{CreateNoteRequest, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/quill").await?;
//!
//!     let note = db.notes.insert(user_id, CreateNoteRequest {
//!         title: "Hello".to_string(),
//!         content: "First note".to_string(),
//!         tags_input: Some(vec!["Work".to_string()]),
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod pool;
pub mod profiles;
pub mod tags;
pub mod token_blacklist;
pub mod users;

// Re-export core types
pub use quill_core::*;

// Re-export repository implementations
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use profiles::PgProfileRepository;
pub use tags::PgTagRepository;
pub use token_blacklist::PgTokenBlacklistRepository;
pub use users::PgUserRepository;

/// Aggregate of every repository, sharing one connection pool.
#[derive(Clone)]
pub struct Database {
    pub users: std::sync::Arc<PgUserRepository>,
    pub profiles: std::sync::Arc<PgProfileRepository>,
    pub notes: std::sync::Arc<PgNoteRepository>,
    pub tags: std::sync::Arc<PgTagRepository>,
    pub token_blacklist: std::sync::Arc<PgTokenBlacklistRepository>,
    pool: sqlx::Pool<sqlx::Postgres>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: std::sync::Arc::new(PgUserRepository::new(pool.clone())),
            profiles: std::sync::Arc::new(PgProfileRepository::new(pool.clone())),
            notes: std::sync::Arc::new(PgNoteRepository::new(pool.clone())),
            tags: std::sync::Arc::new(PgTagRepository::new(pool.clone())),
            token_blacklist: std::sync::Arc::new(PgTokenBlacklistRepository::new(pool.clone())),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
