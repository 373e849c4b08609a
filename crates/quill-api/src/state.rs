//! Shared application state.

use std::sync::Arc;

use quill_auth::TokenSigner;
use quill_core::AppConfig;
use quill_db::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    /// Mints and validates session tokens with the configured key.
    pub signer: TokenSigner,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let signer = TokenSigner::new(&config.auth);
        Self {
            db,
            config: Arc::new(config),
            signer,
        }
    }
}
