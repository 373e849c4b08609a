//! Repository traits for quill abstractions.
//!
//! These traits define the persistence interfaces the HTTP layer talks to,
//! enabling pluggable backends and testability. Concrete PostgreSQL
//! implementations live in `quill-db`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Repository for account rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and their (empty) profile in one transaction.
    async fn create(&self, user: NewUser) -> Result<User>;

    /// Look up a user by username, including the password hash.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserWithPassword>>;

    /// Fetch a user by id.
    async fn fetch(&self, id: Uuid) -> Result<User>;

    /// Stamp `last_login` after a successful credential exchange.
    async fn record_login(&self, id: Uuid) -> Result<()>;

    /// Update the user's email address. Username is immutable.
    async fn update_email(&self, id: Uuid, email: &str) -> Result<()>;
}

/// Repository for the one-to-one user profile extension.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile for a user, creating a default row if missing.
    ///
    /// Profile existence is eventually consistent with user existence;
    /// this is the lazy half of that invariant.
    async fn get_or_create(&self, user_id: Uuid) -> Result<UserProfile>;

    /// Apply a partial update, writing only supplied fields.
    async fn update(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile>;
}

/// Repository for note CRUD. Every operation is scoped to the owning user;
/// someone else's note is indistinguishable from a missing one.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note with its normalized tags.
    async fn insert(&self, user_id: Uuid, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note owned by `user_id`.
    async fn fetch(&self, user_id: Uuid, note_id: Uuid) -> Result<Note>;

    /// List the user's notes, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Note>>;

    /// Update title/content/tags. A supplied tag list replaces the existing
    /// associations; an omitted one leaves them untouched.
    async fn update(&self, user_id: Uuid, note_id: Uuid, req: UpdateNoteRequest) -> Result<Note>;

    /// Delete a note owned by `user_id`.
    async fn delete(&self, user_id: Uuid, note_id: Uuid) -> Result<()>;
}

/// Repository for the globally shared tag set.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags, ordered by name.
    async fn list(&self) -> Result<Vec<Tag>>;
}

/// Repository for revoked refresh tokens.
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync {
    /// Record a refresh token's jti as revoked. Idempotent.
    async fn blacklist(
        &self,
        jti: Uuid,
        user_id: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Check whether a jti has been revoked.
    async fn is_blacklisted(&self, jti: Uuid) -> Result<bool>;

    /// Drop blacklist rows whose tokens are expired anyway. Returns the
    /// number of rows removed.
    async fn purge_expired(&self) -> Result<u64>;
}
