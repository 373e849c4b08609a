//! Session handlers: credential exchange, refresh, verify, logout.
//!
//! Token material never appears in response bodies; both tokens travel in
//! HTTP-only cookies and the bodies only acknowledge the outcome.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info};

use quill_auth::TokenKind;
use quill_core::{TokenBlacklistRepository, UserRepository};

use crate::cookies::{clear_cookie, token_cookie};
use crate::error::ApiError;
use crate::extract::{resolve_token, RawToken};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /token/` — exchange credentials for a cookie session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let found = state.db.users.find_by_username(&req.username).await?;

    let Some(found) = found else {
        return Err(ApiError::Unauthorized(
            "No active account found with the given credentials".to_string(),
        ));
    };

    if !quill_auth::verify_password(&req.password, &found.password_hash)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?
    {
        return Err(ApiError::Unauthorized(
            "No active account found with the given credentials".to_string(),
        ));
    }

    let user = found.user;
    state.db.users.record_login(user.id).await?;

    let (access, _) = state.signer.issue(TokenKind::Access, user.id)?;
    let (refresh, _) = state.signer.issue(TokenKind::Refresh, user.id)?;

    let auth = &state.config.auth;
    let jar = jar
        .add(token_cookie(
            &auth.cookie.access_name,
            access,
            auth.access_token_lifetime,
            &auth.cookie,
        ))
        .add(token_cookie(
            &auth.cookie.refresh_name,
            refresh,
            auth.refresh_token_lifetime,
            &auth.cookie,
        ));

    info!(
        subsystem = "api",
        component = "session",
        op = "login",
        user_id = %user.id,
        "Login successful"
    );

    Ok((jar, Json(serde_json::json!({"message": "Login successful!"}))))
}

/// `POST /token/refresh/` — rotate the session from the refresh cookie.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let auth = &state.config.auth;

    let Some(cookie) = jar.get(&auth.cookie.refresh_name) else {
        return Err(ApiError::Unauthorized(
            "Refresh token cookie not found.".to_string(),
        ));
    };

    let claims = state.signer.decode(cookie.value(), TokenKind::Refresh)?;
    let jti = claims.jti()?;
    let user_id = claims.user_id()?;

    if state.db.token_blacklist.is_blacklisted(jti).await? {
        return Err(quill_auth::AuthError::Blacklisted.into());
    }

    let (access, _) = state.signer.issue(TokenKind::Access, user_id)?;
    let mut jar = jar.add(token_cookie(
        &auth.cookie.access_name,
        access,
        auth.access_token_lifetime,
        &auth.cookie,
    ));

    // With rotation, the presented refresh token is spent: blacklist it and
    // hand out a replacement. Without rotation, the cookie stays as-is.
    if auth.rotate_refresh_tokens {
        if auth.blacklist_after_rotation {
            state
                .db
                .token_blacklist
                .blacklist(jti, Some(user_id), claims.expires_at())
                .await?;
        }

        let (new_refresh, new_claims) = state.signer.issue(TokenKind::Refresh, user_id)?;
        jar = jar.add(token_cookie(
            &auth.cookie.refresh_name,
            new_refresh,
            auth.refresh_token_lifetime,
            &auth.cookie,
        ));

        debug!(
            subsystem = "api",
            component = "session",
            op = "refresh",
            user_id = %user_id,
            jti = %new_claims.jti,
            "Refresh token rotated"
        );
    }

    Ok((
        jar,
        Json(serde_json::json!({"detail": "Tokens refreshed successfully."})),
    ))
}

/// `GET /token/verify` — validate the presented access token.
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cookie_value = jar
        .get(&state.config.auth.cookie.access_name)
        .map(|c| c.value().to_string());
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match resolve_token(cookie_value.as_deref(), auth_header) {
        RawToken::Missing => {
            return Err(ApiError::Unauthorized(
                "Authentication credentials were not provided.".to_string(),
            ))
        }
        RawToken::Malformed(msg) => return Err(ApiError::Unauthorized(msg.to_string())),
        RawToken::Found(token) => token,
    };

    state.signer.decode(&token, TokenKind::Access)?;
    Ok(Json(serde_json::json!({})))
}

/// `POST /logout/` — best-effort refresh revocation, unconditional cookie
/// clearing.
///
/// A missing or already-invalid refresh token is not an error; the cookies
/// are expired either way.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let auth = &state.config.auth;

    if let Some(cookie) = jar.get(&auth.cookie.refresh_name) {
        match state.signer.decode(cookie.value(), TokenKind::Refresh) {
            Ok(claims) => {
                if let (Ok(jti), Ok(user_id)) = (claims.jti(), claims.user_id()) {
                    if let Err(err) = state
                        .db
                        .token_blacklist
                        .blacklist(jti, Some(user_id), claims.expires_at())
                        .await
                    {
                        debug!(
                            subsystem = "api",
                            component = "session",
                            op = "logout",
                            error = %err,
                            "Refresh token blacklisting failed; clearing cookies anyway"
                        );
                    }
                }
            }
            Err(err) => {
                debug!(
                    subsystem = "api",
                    component = "session",
                    op = "logout",
                    error = %err,
                    "Refresh token already invalid; nothing to blacklist"
                );
            }
        }
    }

    let jar = jar
        .add(clear_cookie(&auth.cookie.access_name, &auth.cookie))
        .add(clear_cookie(&auth.cookie.refresh_name, &auth.cookie));

    (jar, Json(serde_json::json!({"message": "Logout successful"})))
}
