//! Account and profile handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use quill_core::{NewUser, ProfilePatch, ProfileRepository, UserRepository};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    /// Confirmation field; required to be present but only the first
    /// password is stored.
    pub password2: String,
}

/// `POST /register/` — create a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::BadRequest("Username may not be blank.".to_string()));
    }
    if req.password.is_empty() || req.password2.is_empty() {
        return Err(ApiError::BadRequest("Password may not be blank.".to_string()));
    }
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("Enter a valid email address.".to_string()));
    }

    let password_hash = quill_auth::hash_password(&req.password)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state
        .db
        .users
        .create(NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await?;

    info!(
        subsystem = "api",
        component = "users",
        op = "register",
        user_id = %user.id,
        username = %user.username,
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({"email": user.email, "username": user.username})),
    ))
}

/// `GET /me/` — identity of the authenticated user.
pub async fn me(current: CurrentUser) -> Json<serde_json::Value> {
    Json(json!({
        "email": current.user.email,
        "username": current.user.username,
    }))
}

fn profile_body(user: &quill_core::User, profile: &quill_core::UserProfile) -> serde_json::Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "profile": {
            "first_name": profile.first_name,
            "last_name": profile.last_name,
            "mode_preference": profile.mode_preference,
            "is_profile_setup_completed": profile.is_profile_setup_completed,
        },
    })
}

/// `GET /user/profile/` — account fields plus the profile extension.
pub async fn get_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let profile = state.db.profiles.get_or_create(current.user.id).await?;
    Ok(Json(profile_body(&current.user, &profile)))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub profile: Option<ProfilePatch>,
}

/// `PUT`/`PATCH /user/profile/` — partial update of email and profile
/// fields. Both verbs behave the same: omitted fields are left alone.
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(ApiError::BadRequest("Enter a valid email address.".to_string()));
        }
        state.db.users.update_email(current.user.id, email).await?;
    }

    let profile = match req.profile {
        Some(patch) => state.db.profiles.update(current.user.id, patch).await?,
        None => state.db.profiles.get_or_create(current.user.id).await?,
    };

    // Re-fetch so a changed email shows up in the response.
    let user = state.db.users.fetch(current.user.id).await?;

    info!(
        subsystem = "api",
        component = "users",
        op = "update_profile",
        user_id = %user.id,
        "Profile updated"
    );

    Ok(Json(profile_body(&user, &profile)))
}
