//! # quill-auth
//!
//! Credential primitives for quill.
//!
//! This crate provides:
//! - **Password storage**: Argon2id hashes in PHC string format
//! - **Session tokens**: HS256-signed JWTs, a short-lived access token and a
//!   revocable refresh token carrying a `jti` for blacklisting
//!
//! Token persistence (the refresh blacklist) lives in `quill-db`; this crate
//! only mints and validates.

pub mod error;
pub mod password;
pub mod token;

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKind, TokenSigner};
