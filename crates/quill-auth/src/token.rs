//! JWT session tokens using HS256.
//!
//! Two token kinds share one signing key: a short-lived `access` token that
//! authorizes API requests, and a longer-lived `refresh` token that is
//! exchanged for new tokens and can be revoked via its `jti`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::config::AuthSettings;

use crate::error::{AuthError, AuthResult};

/// The two token kinds minted by [`TokenSigner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — user UUID.
    pub sub: String,
    /// Token kind: "access" or "refresh".
    pub token_type: String,
    /// Unique token id; refresh tokens are blacklisted by this.
    pub jti: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim back into a user id.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSubject)
    }

    /// Parse the jti claim into a UUID.
    pub fn jti(&self) -> AuthResult<Uuid> {
        Uuid::parse_str(&self.jti).map_err(|_| AuthError::InvalidToken("bad jti".to_string()))
    }

    /// Token expiry as a UTC timestamp.
    pub fn expires_at(&self) -> chrono::DateTime<Utc> {
        chrono::DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Mints and validates session tokens with a fixed key and lifetimes.
///
/// Construct once from [`AuthSettings`] at startup and share via application
/// state; the signer is cheap to clone.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_lifetime_secs: i64,
    refresh_lifetime_secs: i64,
}

impl TokenSigner {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.signing_key.as_bytes()),
            decoding: DecodingKey::from_secret(settings.signing_key.as_bytes()),
            access_lifetime_secs: settings.access_token_lifetime.as_secs() as i64,
            refresh_lifetime_secs: settings.refresh_token_lifetime.as_secs() as i64,
        }
    }

    /// Mint a token of the given kind for a user. Each call produces a
    /// fresh `jti`, so two tokens minted in the same second still differ.
    pub fn issue(&self, kind: TokenKind, user_id: Uuid) -> AuthResult<(String, Claims)> {
        let now = Utc::now().timestamp();
        let lifetime = match kind {
            TokenKind::Access => self.access_lifetime_secs,
            TokenKind::Refresh => self.refresh_lifetime_secs,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            token_type: kind.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + lifetime,
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok((token, claims))
    }

    /// Decode and validate a token, requiring it to be of `expected` kind.
    ///
    /// Expired tokens map to [`AuthError::Expired`]; every other failure
    /// (bad signature, malformed, wrong kind) is an invalid-token error.
    pub fn decode(&self, token: &str, expected: TokenKind) -> AuthResult<Claims> {
        let mut validation = Validation::default();
        // No clock leeway: a token is expired the second its exp passes.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.token_type != expected.as_str() {
            return Err(AuthError::WrongKind {
                expected: expected.as_str(),
                actual: data.claims.token_type,
            });
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::config::AuthSettings;
    use std::time::Duration;

    fn test_signer() -> TokenSigner {
        let settings = AuthSettings {
            signing_key: "test-secret-key-minimum-32-chars!!".to_string(),
            access_token_lifetime: Duration::from_secs(600),
            refresh_token_lifetime: Duration::from_secs(86400),
            ..AuthSettings::default()
        };
        TokenSigner::new(&settings)
    }

    #[test]
    fn test_issue_and_decode_access_token() {
        let signer = test_signer();
        let user_id = Uuid::new_v4();
        let (token, minted) = signer.issue(TokenKind::Access, user_id).unwrap();

        let claims = signer.decode(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.jti, minted.jti);
        assert_eq!(claims.exp - claims.iat, 600);
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_refresh_lifetime_is_longer() {
        let signer = test_signer();
        let (_, claims) = signer.issue(TokenKind::Refresh, Uuid::new_v4()).unwrap();
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_each_issue_gets_a_fresh_jti() {
        let signer = test_signer();
        let user_id = Uuid::new_v4();
        let (a, ca) = signer.issue(TokenKind::Refresh, user_id).unwrap();
        let (b, cb) = signer.issue(TokenKind::Refresh, user_id).unwrap();
        assert_ne!(ca.jti, cb.jti);
        assert_ne!(a, b);
    }

    #[test]
    fn test_access_token_rejected_where_refresh_expected() {
        let signer = test_signer();
        let (token, _) = signer.issue(TokenKind::Access, Uuid::new_v4()).unwrap();
        let err = signer.decode(&token, TokenKind::Refresh).unwrap_err();
        assert!(matches!(err, AuthError::WrongKind { .. }));
    }

    #[test]
    fn test_expired_token_maps_to_expired_error() {
        let signer = test_signer();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret-key-minimum-32-chars!!".as_bytes()),
        )
        .unwrap();

        let err = signer.decode(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
        assert_eq!(err.to_string(), "Access token has expired.");
    }

    #[test]
    fn test_wrong_secret_rejected_as_invalid() {
        let signer = test_signer();
        let (token, _) = signer.issue(TokenKind::Access, Uuid::new_v4()).unwrap();

        let other = TokenSigner::new(&AuthSettings {
            signing_key: "wrong-secret-that-is-also-32chars!".to_string(),
            ..AuthSettings::default()
        });
        let err = other.decode(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_garbage_token_rejected_as_invalid() {
        let signer = test_signer();
        let err = signer.decode("not.a.jwt", TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
