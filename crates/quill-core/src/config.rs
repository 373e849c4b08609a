//! Application configuration.
//!
//! A single immutable [`AppConfig`] is constructed from the environment at
//! process start and handed to every component that needs it. Nothing reads
//! environment variables after startup.

use std::time::Duration;

use crate::error::{Error, Result};

/// Fallback signing key for local development only.
const DEV_SIGNING_KEY: &str = "quill-insecure-dev-signing-key-do-not-deploy";

/// `SameSite` policy for the token cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSitePolicy {
    #[default]
    Lax,
    Strict,
    None,
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lax" => Ok(Self::Lax),
            "strict" => Ok(Self::Strict),
            "none" => Ok(Self::None),
            other => Err(format!("Invalid SameSite policy: {}", other)),
        }
    }
}

/// Cookie attributes for the access and refresh token cookies.
///
/// `HttpOnly` is not configurable: token cookies are always flagged.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Name of the access token cookie.
    pub access_name: String,
    /// Name of the refresh token cookie.
    pub refresh_name: String,
    /// Cookie domain, if pinned to one.
    pub domain: Option<String>,
    /// Cookie path.
    pub path: String,
    /// `Secure` flag; must be true behind HTTPS in production.
    pub secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSitePolicy,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            access_name: "access_token".to_string(),
            refresh_name: "refresh_token".to_string(),
            domain: None,
            path: "/".to_string(),
            secure: false,
            same_site: SameSitePolicy::Lax,
        }
    }
}

/// Token issuance settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HS256 signing key shared by access and refresh tokens.
    pub signing_key: String,
    /// Access token lifetime (default: 10 minutes).
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime (default: 1 day).
    pub refresh_token_lifetime: Duration,
    /// Mint a new refresh token on every refresh.
    pub rotate_refresh_tokens: bool,
    /// Blacklist the replaced refresh token after rotation.
    pub blacklist_after_rotation: bool,
    /// Cookie attributes.
    pub cookie: CookieSettings,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            signing_key: DEV_SIGNING_KEY.to_string(),
            access_token_lifetime: Duration::from_secs(10 * 60),
            refresh_token_lifetime: Duration::from_secs(24 * 60 * 60),
            rotate_refresh_tokens: true,
            blacklist_after_rotation: true,
            cookie: CookieSettings::default(),
        }
    }
}

/// Immutable process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    pub auth: AuthSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/quill".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            auth: AuthSettings::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset. `.env` files are honored.
    ///
    /// Returns an error only for values that are present but unparseable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let signing_key = match std::env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!(
                    subsystem = "config",
                    "SECRET_KEY not set; using insecure development signing key"
                );
                DEV_SIGNING_KEY.to_string()
            }
        };

        let cookie = CookieSettings {
            access_name: env_or("AUTH_COOKIE", &defaults.auth.cookie.access_name),
            refresh_name: env_or("AUTH_COOKIE_REFRESH", &defaults.auth.cookie.refresh_name),
            domain: std::env::var("AUTH_COOKIE_DOMAIN").ok().filter(|d| !d.is_empty()),
            path: env_or("AUTH_COOKIE_PATH", &defaults.auth.cookie.path),
            secure: env_bool("AUTH_COOKIE_SECURE", defaults.auth.cookie.secure)?,
            same_site: parse_env("AUTH_COOKIE_SAMESITE", defaults.auth.cookie.same_site)?,
        };

        let auth = AuthSettings {
            signing_key,
            access_token_lifetime: Duration::from_secs(env_parse(
                "ACCESS_TOKEN_LIFETIME_SECS",
                defaults.auth.access_token_lifetime.as_secs(),
            )?),
            refresh_token_lifetime: Duration::from_secs(env_parse(
                "REFRESH_TOKEN_LIFETIME_SECS",
                defaults.auth.refresh_token_lifetime.as_secs(),
            )?),
            rotate_refresh_tokens: env_bool(
                "ROTATE_REFRESH_TOKENS",
                defaults.auth.rotate_refresh_tokens,
            )?,
            blacklist_after_rotation: env_bool(
                "BLACKLIST_AFTER_ROTATION",
                defaults.auth.blacklist_after_rotation,
            )?,
            cookie,
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_origins);

        Ok(Self {
            database_url: env_or("DATABASE_URL", &defaults.database_url),
            host: env_or("HOST", &defaults.host),
            port: env_parse("PORT", defaults.port)?,
            allowed_origins,
            auth,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

fn env_bool(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(Error::Config(format!(
                "{} must be true/false, got: {}",
                key, other
            ))),
        },
        Err(_) => Ok(default),
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(Error::Config),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_lifetimes() {
        let auth = AuthSettings::default();
        assert_eq!(auth.access_token_lifetime, Duration::from_secs(600));
        assert_eq!(auth.refresh_token_lifetime, Duration::from_secs(86400));
        assert!(auth.rotate_refresh_tokens);
        assert!(auth.blacklist_after_rotation);
    }

    #[test]
    fn test_default_cookie_settings() {
        let cookie = CookieSettings::default();
        assert_eq!(cookie.access_name, "access_token");
        assert_eq!(cookie.refresh_name, "refresh_token");
        assert_eq!(cookie.path, "/");
        assert!(!cookie.secure);
        assert_eq!(cookie.same_site, SameSitePolicy::Lax);
        assert!(cookie.domain.is_none());
    }

    #[test]
    fn test_same_site_parsing() {
        assert_eq!(SameSitePolicy::from_str("lax").unwrap(), SameSitePolicy::Lax);
        assert_eq!(
            SameSitePolicy::from_str("Strict").unwrap(),
            SameSitePolicy::Strict
        );
        assert_eq!(
            SameSitePolicy::from_str("none").unwrap(),
            SameSitePolicy::None
        );
        assert!(SameSitePolicy::from_str("bogus").is_err());
    }
}
