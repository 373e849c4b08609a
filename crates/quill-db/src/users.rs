//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use quill_core::{Error, NewUser, Result, User, UserRepository, UserWithPassword, NAME_MAX_LEN};

/// Validate a username: non-empty, within length, no surrounding whitespace.
pub fn validate_username(username: &str) -> std::result::Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.chars().count() > NAME_MAX_LEN {
        return Err(format!(
            "Username must be {} characters or less",
            NAME_MAX_LEN
        ));
    }
    if username.trim() != username {
        return Err("Username cannot start or end with whitespace".to_string());
    }
    Ok(())
}

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        created_at: row.get("created_at"),
        last_login: row.get("last_login"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        validate_username(&user.username).map_err(Error::InvalidInput)?;
        if user.email.is_empty() {
            return Err(Error::InvalidInput("Email cannot be empty".to_string()));
        }

        let id = Uuid::now_v7();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query(
            "INSERT INTO app_user (id, username, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        // The profile row rides along with the user, mirroring a post-save
        // hook. get_or_create covers any user that predates this.
        sqlx::query("INSERT INTO user_profile (user_id) VALUES ($1)")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            created_at: now,
            last_login: None,
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserWithPassword>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at, last_login
             FROM app_user WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|row| UserWithPassword {
            user: user_from_row(&row),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn fetch(&self, id: Uuid) -> Result<User> {
        let row = sqlx::query(
            "SELECT id, username, email, created_at, last_login
             FROM app_user WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("User not found: {}", id)))?;

        Ok(user_from_row(&row))
    }

    async fn record_login(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE app_user SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<()> {
        if email.is_empty() {
            return Err(Error::InvalidInput("Email cannot be empty".to_string()));
        }
        let result = sqlx::query("UPDATE app_user SET email = $2 WHERE id = $1")
            .bind(id)
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("User not found: {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_rejects_empty() {
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_username_rejects_overlong() {
        let long = "u".repeat(NAME_MAX_LEN + 1);
        assert!(validate_username(&long).is_err());
        let max = "u".repeat(NAME_MAX_LEN);
        assert!(validate_username(&max).is_ok());
    }

    #[test]
    fn test_validate_username_rejects_surrounding_whitespace() {
        assert!(validate_username(" alice").is_err());
        assert!(validate_username("alice ").is_err());
        assert!(validate_username("alice").is_ok());
    }
}
