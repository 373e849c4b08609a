//! Token cookie construction.
//!
//! Both session cookies are always `HttpOnly`; everything else about them
//! (`Secure`, `SameSite`, domain, path) comes from [`CookieSettings`].

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use quill_core::config::{CookieSettings, SameSitePolicy};

fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::None => SameSite::None,
    }
}

/// Build a token cookie with the configured attributes and a max-age.
pub fn token_cookie(
    name: &str,
    value: String,
    max_age: std::time::Duration,
    settings: &CookieSettings,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name.to_string(), value))
        .http_only(true)
        .secure(settings.secure)
        .same_site(same_site(settings.same_site))
        .path(settings.path.clone())
        .max_age(Duration::seconds(max_age.as_secs() as i64));

    if let Some(domain) = &settings.domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

/// Build a cookie that unsets `name`: empty value, expiry in the past.
pub fn clear_cookie(name: &str, settings: &CookieSettings) -> Cookie<'static> {
    let mut builder = Cookie::build((name.to_string(), String::new()))
        .http_only(true)
        .secure(settings.secure)
        .same_site(same_site(settings.same_site))
        .path(settings.path.clone())
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH);

    if let Some(domain) = &settings.domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CookieSettings {
        CookieSettings::default()
    }

    #[test]
    fn test_token_cookie_is_http_only_with_max_age() {
        let cookie = token_cookie(
            "access_token",
            "tok".to_string(),
            std::time::Duration::from_secs(600),
            &settings(),
        );
        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(600)));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn test_secure_and_domain_come_from_settings() {
        let cookie = token_cookie(
            "refresh_token",
            "tok".to_string(),
            std::time::Duration::from_secs(86400),
            &CookieSettings {
                secure: true,
                domain: Some("notes.example.com".to_string()),
                same_site: SameSitePolicy::Strict,
                ..CookieSettings::default()
            },
        );
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.domain(), Some("notes.example.com"));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[test]
    fn test_clear_cookie_expires_in_the_past() {
        let cookie = clear_cookie("access_token", &settings());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        let expires = cookie.expires_datetime().expect("expires must be set");
        assert!(expires <= OffsetDateTime::UNIX_EPOCH);
    }
}
