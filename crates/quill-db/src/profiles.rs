//! User profile repository implementation.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use quill_core::{
    Error, ProfilePatch, ProfileRepository, Result, ThemePreference, UserProfile, NAME_MAX_LEN,
};

/// PostgreSQL implementation of ProfileRepository.
pub struct PgProfileRepository {
    pool: Pool<Postgres>,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &sqlx::postgres::PgRow) -> Result<UserProfile> {
    let mode: String = row.get("mode_preference");
    Ok(UserProfile {
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        mode_preference: ThemePreference::from_str(&mode).map_err(Error::Internal)?,
        is_profile_setup_completed: row.get("is_profile_setup_completed"),
    })
}

fn validate_patch(patch: &ProfilePatch) -> Result<()> {
    for (field, value) in [
        ("first_name", &patch.first_name),
        ("last_name", &patch.last_name),
    ] {
        if let Some(v) = value {
            if v.chars().count() > NAME_MAX_LEN {
                return Err(Error::InvalidInput(format!(
                    "{} must be {} characters or less",
                    field, NAME_MAX_LEN
                )));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get_or_create(&self, user_id: Uuid) -> Result<UserProfile> {
        // ON CONFLICT settles the race between two first touches; the
        // RETURNING row is the winner's either way.
        let row = sqlx::query(
            "INSERT INTO user_profile (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING first_name, last_name, mode_preference, is_profile_setup_completed",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        profile_from_row(&row)
    }

    async fn update(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile> {
        validate_patch(&patch)?;

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query(
            "INSERT INTO user_profile (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING first_name, last_name, mode_preference, is_profile_setup_completed",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let updated = patch.apply(profile_from_row(&row)?);

        sqlx::query(
            "UPDATE user_profile
             SET first_name = $2, last_name = $3, mode_preference = $4,
                 is_profile_setup_completed = $5
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(&updated.first_name)
        .bind(&updated.last_name)
        .bind(updated.mode_preference.as_str())
        .bind(updated.is_profile_setup_completed)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_patch_rejects_overlong_names() {
        let patch = ProfilePatch {
            first_name: Some("x".repeat(NAME_MAX_LEN + 1)),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_err());
    }

    #[test]
    fn test_validate_patch_accepts_empty_patch() {
        assert!(validate_patch(&ProfilePatch::default()).is_ok());
    }
}
