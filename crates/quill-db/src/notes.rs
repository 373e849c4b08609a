//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use quill_core::{
    normalize_tag, tags::validate_tag, CreateNoteRequest, Error, Note, NoteRepository, Result,
    UpdateNoteRequest, CONTENT_MAX_LEN, TITLE_MAX_LEN,
};

/// PostgreSQL implementation of NoteRepository.
///
/// Every query is scoped by owner: a note id belonging to another user
/// behaves exactly like a missing one.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::InvalidInput("Title cannot be empty".to_string()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(Error::InvalidInput(format!(
            "Title must be {} characters or less",
            TITLE_MAX_LEN
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(Error::InvalidInput("Content cannot be empty".to_string()));
    }
    if content.chars().count() > CONTENT_MAX_LEN {
        return Err(Error::InvalidInput(format!(
            "Content must be {} characters or less",
            CONTENT_MAX_LEN
        )));
    }
    Ok(())
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Normalize raw tag strings and link them to a note inside `tx`.
    ///
    /// Tags are get-or-created against the shared tag set; the unique
    /// constraint on `tag.name` settles concurrent creates, and the loser
    /// falls back to the existing row on re-select.
    async fn link_tags(
        tx: &mut Transaction<'_, Postgres>,
        note_id: Uuid,
        raw_tags: &[String],
    ) -> Result<()> {
        let now = Utc::now();

        for raw in raw_tags {
            validate_tag(raw).map_err(Error::InvalidInput)?;
            let name = normalize_tag(raw);

            sqlx::query(
                "INSERT INTO tag (id, name, created_at) VALUES ($1, $2, $3)
                 ON CONFLICT (name) DO NOTHING",
            )
            .bind(Uuid::now_v7())
            .bind(&name)
            .bind(now)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

            let tag_id: Uuid = sqlx::query("SELECT id FROM tag WHERE name = $1")
                .bind(&name)
                .fetch_one(&mut **tx)
                .await
                .map_err(Error::Database)?
                .get("id");

            sqlx::query(
                "INSERT INTO note_tag (note_id, tag_id) VALUES ($1, $2)
                 ON CONFLICT (note_id, tag_id) DO NOTHING",
            )
            .bind(note_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }

        Ok(())
    }
}

const NOTE_WITH_TAGS: &str = r#"
    SELECT
        n.id,
        n.title,
        n.content,
        n.created_at,
        n.updated_at,
        COALESCE(
            array_agg(t.name ORDER BY t.name) FILTER (WHERE t.name IS NOT NULL),
            '{}'
        ) AS tags
    FROM note n
    LEFT JOIN note_tag nt ON nt.note_id = n.id
    LEFT JOIN tag t ON t.id = nt.tag_id
"#;

fn note_from_row(row: &sqlx::postgres::PgRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        tags: row.get("tags"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, user_id: Uuid, req: CreateNoteRequest) -> Result<Note> {
        validate_title(&req.title)?;
        validate_content(&req.content)?;

        let id = Uuid::now_v7();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query(
            "INSERT INTO note (id, user_id, title, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(id)
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if let Some(raw_tags) = &req.tags_input {
            Self::link_tags(&mut tx, id, raw_tags).await?;
        }

        tx.commit().await.map_err(Error::Database)?;

        tracing::debug!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            user_id = %user_id,
            note_id = %id,
            "Note created"
        );

        self.fetch(user_id, id).await
    }

    async fn fetch(&self, user_id: Uuid, note_id: Uuid) -> Result<Note> {
        let sql = format!(
            "{NOTE_WITH_TAGS} WHERE n.id = $1 AND n.user_id = $2
             GROUP BY n.id, n.title, n.content, n.created_at, n.updated_at"
        );
        let row = sqlx::query(&sql)
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(note_id))?;

        Ok(note_from_row(&row))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Note>> {
        let sql = format!(
            "{NOTE_WITH_TAGS} WHERE n.user_id = $1
             GROUP BY n.id, n.title, n.content, n.created_at, n.updated_at
             ORDER BY n.created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn update(&self, user_id: Uuid, note_id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        if let Some(title) = &req.title {
            validate_title(title)?;
        }
        if let Some(content) = &req.content {
            validate_content(content)?;
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result = sqlx::query(
            "UPDATE note
             SET title = COALESCE($3, title),
                 content = COALESCE($4, content),
                 updated_at = $5
             WHERE id = $1 AND user_id = $2",
        )
        .bind(note_id)
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(note_id));
        }

        // A supplied tag list fully replaces the associations, including
        // the empty list; an omitted one leaves them untouched.
        if let Some(raw_tags) = &req.tags_input {
            sqlx::query("DELETE FROM note_tag WHERE note_id = $1")
                .bind(note_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;

            Self::link_tags(&mut tx, note_id, raw_tags).await?;
        }

        tx.commit().await.map_err(Error::Database)?;

        self.fetch(user_id, note_id).await
    }

    async fn delete(&self, user_id: Uuid, note_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(note_id));
        }

        tracing::debug!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            user_id = %user_id,
            note_id = %note_id,
            "Note deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_limits() {
        assert!(validate_title("").is_err());
        assert!(validate_title(&"t".repeat(TITLE_MAX_LEN)).is_ok());
        assert!(validate_title(&"t".repeat(TITLE_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_content_limits() {
        assert!(validate_content("").is_err());
        assert!(validate_content(&"c".repeat(CONTENT_MAX_LEN)).is_ok());
        assert!(validate_content(&"c".repeat(CONTENT_MAX_LEN + 1)).is_err());
    }
}
