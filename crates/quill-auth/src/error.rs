//! Error types for credential operations.

use thiserror::Error;

/// Result type alias for credential operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Credential operation errors.
///
/// `Expired` is kept distinct from the other token failures so callers can
/// surface a message the frontend can act on (trigger a silent refresh)
/// while still mapping every variant to the same HTTP status class.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Token signature/expiry validation succeeded for the wrong lifetime.
    #[error("Access token has expired.")]
    Expired,

    /// Malformed token, invalid signature, or wrong claim shape.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A token of one kind was presented where the other was required.
    #[error("Invalid token: expected {expected} token, got {actual}")]
    WrongKind {
        expected: &'static str,
        actual: String,
    },

    /// The refresh token's jti is on the blacklist.
    #[error("Token is blacklisted")]
    Blacklisted,

    /// Password hashing or verification failed internally.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Claim subject is not a valid user id.
    #[error("Invalid token: subject is not a valid id")]
    InvalidSubject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_message_is_stable() {
        // The frontend matches on this text to trigger a silent refresh.
        assert_eq!(AuthError::Expired.to_string(), "Access token has expired.");
    }

    #[test]
    fn test_invalid_token_message_prefix() {
        let err = AuthError::InvalidToken("bad signature".to_string());
        assert!(err.to_string().starts_with("Invalid token:"));
    }

    #[test]
    fn test_wrong_kind_message() {
        let err = AuthError::WrongKind {
            expected: "refresh",
            actual: "access".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid token: expected refresh token, got access"
        );
    }
}
