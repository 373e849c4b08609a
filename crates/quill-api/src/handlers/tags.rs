//! Tag listing. Tags are a single shared vocabulary across all users.

use axum::extract::State;
use axum::Json;

use quill_core::{Tag, TagRepository};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// `GET /tags/` — every known tag, ordered by name.
pub async fn list_tags(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.db.tags.list().await?;
    Ok(Json(tags))
}
