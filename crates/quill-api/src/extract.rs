//! Request authentication extractors.
//!
//! Token resolution is a two-step affair: the designated cookie wins, the
//! `Authorization: Bearer` header is the fallback. The outcome is modeled
//! explicitly so "no credentials" and "garbled header" stay distinct.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use quill_auth::{Claims, TokenKind};
use quill_core::{User, UserRepository};

use crate::error::ApiError;
use crate::state::AppState;

/// Outcome of looking for an access token on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    /// No token in the cookie or the header: an anonymous request.
    Missing,
    /// A Bearer header was present but unusable.
    Malformed(&'static str),
    /// A candidate token, not yet validated.
    Found(String),
}

/// Resolve the raw access token from the cookie value and the
/// `Authorization` header, cookie first.
pub fn resolve_token(cookie_value: Option<&str>, auth_header: Option<&str>) -> RawToken {
    if let Some(value) = cookie_value {
        if !value.is_empty() {
            return RawToken::Found(value.to_string());
        }
    }

    let Some(header_value) = auth_header else {
        return RawToken::Missing;
    };

    let parts: Vec<&str> = header_value.split_whitespace().collect();
    match parts.as_slice() {
        [] => RawToken::Missing,
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => RawToken::Missing,
        [_] => RawToken::Malformed("Invalid token header. No credentials provided."),
        [_, token] => RawToken::Found(token.to_string()),
        _ => RawToken::Malformed("Invalid token header. Token string should not contain spaces."),
    }
}

/// Resolve the raw token straight from request parts.
pub fn resolve_from_parts(parts: &Parts, access_cookie_name: &str) -> RawToken {
    let jar = CookieJar::from_headers(&parts.headers);
    let cookie_value = jar.get(access_cookie_name).map(|c| c.value().to_string());
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    resolve_token(cookie_value.as_deref(), auth_header)
}

/// Extractor that requires a valid access token and resolves its subject.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(auth: CurrentUser) -> Json<UserResponse> {
///     Json(auth.user.into())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub claims: Claims,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match resolve_from_parts(parts, &state.config.auth.cookie.access_name) {
            RawToken::Missing => {
                return Err(ApiError::Unauthorized(
                    "Authentication credentials were not provided.".to_string(),
                ))
            }
            RawToken::Malformed(msg) => return Err(ApiError::Unauthorized(msg.to_string())),
            RawToken::Found(token) => token,
        };

        let claims = state.signer.decode(&token, TokenKind::Access)?;
        let user_id = claims.user_id()?;

        let user = state.db.users.fetch(user_id).await.map_err(|err| match err {
            quill_core::Error::NotFound(_) => {
                ApiError::Unauthorized("Invalid token: user no longer exists".to_string())
            }
            other => ApiError::from(other),
        })?;

        Ok(CurrentUser { user, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_wins_over_header() {
        let raw = resolve_token(Some("cookie-token"), Some("Bearer header-token"));
        assert_eq!(raw, RawToken::Found("cookie-token".to_string()));
    }

    #[test]
    fn test_empty_cookie_falls_back_to_header() {
        let raw = resolve_token(Some(""), Some("Bearer header-token"));
        assert_eq!(raw, RawToken::Found("header-token".to_string()));
    }

    #[test]
    fn test_no_cookie_no_header_is_missing() {
        assert_eq!(resolve_token(None, None), RawToken::Missing);
    }

    #[test]
    fn test_non_bearer_scheme_is_missing_not_malformed() {
        assert_eq!(
            resolve_token(None, Some("Basic dXNlcjpwdw==")),
            RawToken::Missing
        );
    }

    #[test]
    fn test_bearer_without_credentials_is_malformed() {
        assert!(matches!(
            resolve_token(None, Some("Bearer")),
            RawToken::Malformed(msg) if msg.contains("No credentials")
        ));
    }

    #[test]
    fn test_bearer_with_spaces_in_token_is_malformed() {
        assert!(matches!(
            resolve_token(None, Some("Bearer abc def")),
            RawToken::Malformed(msg) if msg.contains("should not contain spaces")
        ));
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(
            resolve_token(None, Some("bearer tok")),
            RawToken::Found("tok".to_string())
        );
    }
}
