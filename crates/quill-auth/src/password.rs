//! Password hashing using Argon2id.
//!
//! Hashes are stored in PHC string format, so parameters and salt travel
//! with the hash and can be upgraded without a schema change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{AuthError, AuthResult};

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
///
/// Returns `Ok(false)` for a wrong password; `Err` only when the stored
/// hash itself cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("opensesame").unwrap();
        assert!(!verify_password("open sesame", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hash = hash_password("whatever").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_garbage_stored_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-phc-string").is_err());
    }
}
