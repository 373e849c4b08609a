//! Domain models for quill.
//!
//! Entities mirror the persistence schema; request types are the validated
//! inputs the repositories accept. Wire-level response shapes live next to
//! the HTTP handlers in `quill-api`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum note title length in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum note content length in characters.
pub const CONTENT_MAX_LEN: usize = 5000;

/// Maximum tag name length in characters.
pub const TAG_MAX_LEN: usize = 50;

/// Maximum username / profile name length in characters.
pub const NAME_MAX_LEN: usize = 150;

// =============================================================================
// USERS
// =============================================================================

/// A registered account (safe for client responses, no password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Set on each successful credential exchange.
    pub last_login: Option<DateTime<Utc>>,
}

/// User together with the stored password hash, for credential verification.
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}

/// Input for creating a user row. The password is already hashed by the
/// time it reaches the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// =============================================================================
// PROFILES
// =============================================================================

/// Theme preference stored on a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the OS preference.
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("Invalid theme preference: {}", other)),
        }
    }
}

/// One-to-one profile extension of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mode_preference: ThemePreference,
    pub is_profile_setup_completed: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            first_name: None,
            last_name: None,
            mode_preference: ThemePreference::System,
            is_profile_setup_completed: false,
        }
    }
}

/// Partial profile update. Only supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mode_preference: Option<ThemePreference>,
    pub is_profile_setup_completed: Option<bool>,
}

impl ProfilePatch {
    /// Apply the patch on top of an existing profile, leaving omitted
    /// fields unchanged.
    pub fn apply(self, mut profile: UserProfile) -> UserProfile {
        if let Some(first_name) = self.first_name {
            profile.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = Some(last_name);
        }
        if let Some(mode) = self.mode_preference {
            profile.mode_preference = mode;
        }
        if let Some(done) = self.is_profile_setup_completed {
            profile.is_profile_setup_completed = done;
        }
        profile
    }
}

// =============================================================================
// TAGS
// =============================================================================

/// A globally shared tag. Created lazily on first use, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

// =============================================================================
// NOTES
// =============================================================================

/// A user-owned note with its resolved tag names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Input for creating a note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    /// Raw tag strings; normalized and get-or-created on save.
    pub tags_input: Option<Vec<String>>,
}

/// Input for updating a note. Omitted title/content persist; a supplied
/// tag list (even an empty one) fully replaces the existing associations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags_input: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_theme_preference_default_is_system() {
        assert_eq!(ThemePreference::default(), ThemePreference::System);
    }

    #[test]
    fn test_theme_preference_round_trip() {
        for theme in [
            ThemePreference::Light,
            ThemePreference::Dark,
            ThemePreference::System,
        ] {
            let parsed = ThemePreference::from_str(theme.as_str()).unwrap();
            assert_eq!(parsed, theme);
        }
    }

    #[test]
    fn test_theme_preference_rejects_unknown() {
        assert!(ThemePreference::from_str("solarized").is_err());
        assert!(ThemePreference::from_str("Light").is_err());
    }

    #[test]
    fn test_theme_preference_serde_lowercase() {
        let json = serde_json::to_string(&ThemePreference::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
        let back: ThemePreference = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(back, ThemePreference::System);
    }

    #[test]
    fn test_profile_patch_applies_only_supplied_fields() {
        let profile = UserProfile {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            mode_preference: ThemePreference::Dark,
            is_profile_setup_completed: true,
        };

        let patch = ProfilePatch {
            first_name: Some("Grace".to_string()),
            ..Default::default()
        };

        let updated = patch.apply(profile);
        assert_eq!(updated.first_name.as_deref(), Some("Grace"));
        assert_eq!(updated.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(updated.mode_preference, ThemePreference::Dark);
        assert!(updated.is_profile_setup_completed);
    }

    #[test]
    fn test_profile_patch_empty_is_identity() {
        let profile = UserProfile::default();
        let updated = ProfilePatch::default().apply(profile.clone());
        assert_eq!(updated.first_name, profile.first_name);
        assert_eq!(updated.mode_preference, profile.mode_preference);
        assert_eq!(
            updated.is_profile_setup_completed,
            profile.is_profile_setup_completed
        );
    }

    #[test]
    fn test_update_note_request_omitted_tags_deserializes_to_none() {
        let req: UpdateNoteRequest =
            serde_json::from_str(r#"{"title": "new title"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("new title"));
        assert!(req.tags_input.is_none());
    }

    #[test]
    fn test_update_note_request_empty_tags_deserializes_to_some_empty() {
        let req: UpdateNoteRequest = serde_json::from_str(r#"{"tags_input": []}"#).unwrap();
        assert_eq!(req.tags_input, Some(vec![]));
    }
}
