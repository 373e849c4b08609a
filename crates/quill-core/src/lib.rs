//! # quill-core
//!
//! Core types, traits, and abstractions for the quill notes API.
//!
//! This crate provides the foundational data structures, repository trait
//! definitions, and the immutable application configuration that the other
//! quill crates depend on.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{AppConfig, AuthSettings, CookieSettings, SameSitePolicy};
pub use error::{Error, Result};
pub use models::*;
pub use tags::normalize_tag;
pub use traits::*;
