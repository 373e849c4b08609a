//! Note CRUD handlers.
//!
//! All operations run against the authenticated user's notes; a note id
//! belonging to someone else behaves exactly like a missing one.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use quill_core::{CreateNoteRequest, Note, NoteRepository, UpdateNoteRequest};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Wire representation of a note. Tags are surfaced under `tags_display`
/// as plain normalized names.
#[derive(Debug, Serialize)]
pub struct ApiNote {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub tags_display: Vec<String>,
}

impl From<Note> for ApiNote {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
            tags_display: note.tags,
        }
    }
}

/// `GET /notes/` — the user's notes, newest first.
pub async fn list_notes(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<ApiNote>>, ApiError> {
    let notes = state.db.notes.list(current.user.id).await?;
    Ok(Json(notes.into_iter().map(ApiNote::from).collect()))
}

/// `POST /notes/` — create a note, normalizing and attaching any tags.
pub async fn create_note(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<ApiNote>), ApiError> {
    let note = state.db.notes.insert(current.user.id, req).await?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        user_id = %current.user.id,
        note_id = %note.id,
        "Note created"
    );

    Ok((StatusCode::CREATED, Json(note.into())))
}

/// `GET /note/:id/` — fetch one note.
pub async fn get_note(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(note_id): Path<Uuid>,
) -> Result<Json<ApiNote>, ApiError> {
    let note = state.db.notes.fetch(current.user.id, note_id).await?;
    Ok(Json(note.into()))
}

/// `PUT`/`PATCH /note/:id/` — partial update. Omitted title/content keep
/// their values; a supplied tag list (including `[]`) replaces the
/// existing associations.
pub async fn update_note(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(note_id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<ApiNote>, ApiError> {
    let note = state.db.notes.update(current.user.id, note_id, req).await?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "update",
        user_id = %current.user.id,
        note_id = %note.id,
        "Note updated"
    );

    Ok(Json(note.into()))
}

/// `DELETE /note/:id/` — delete one note.
pub async fn delete_note(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(note_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.notes.delete(current.user.id, note_id).await?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        user_id = %current.user.id,
        note_id = %note_id,
        "Note deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
