//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use quill_auth::AuthError;

/// API-level error, mapped onto an HTTP status and a `{"error": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    Database(quill_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<quill_core::Error> for ApiError {
    fn from(err: quill_core::Error) -> Self {
        match &err {
            quill_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            quill_core::Error::NoteNotFound(_) => ApiError::NotFound(err.to_string()),
            quill_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            quill_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            quill_core::Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            quill_core::Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    // Friendly messages for known constraints
                    let friendly_msg = if msg.contains("app_user_username_key") {
                        "A user with this username already exists".to_string()
                    } else if msg.contains("tag_name_key") {
                        "A tag with this name already exists".to_string()
                    } else {
                        msg
                    };
                    return ApiError::Conflict(friendly_msg);
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        // All token failures are the same HTTP class; only the message
        // distinguishes expired from invalid.
        ApiError::Unauthorized(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_note_not_found_maps_to_404() {
        let err: ApiError = quill_core::Error::NoteNotFound(Uuid::new_v4()).into();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err: ApiError = quill_core::Error::InvalidInput("too long".to_string()).into();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_expired_token_maps_to_401_with_message() {
        let err: ApiError = AuthError::Expired.into();
        match &err {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Access token has expired."),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
        assert_eq!(status_of(err), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_token_maps_to_401() {
        let err: ApiError = AuthError::InvalidToken("bad signature".to_string()).into();
        assert_eq!(status_of(err), StatusCode::UNAUTHORIZED);
    }
}
