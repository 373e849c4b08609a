//! Tag name normalization.
//!
//! User-supplied tag text is canonicalized before it touches the shared tag
//! set so that `"Work"`, `"work"`, and `"WORK"` dedupe to one row.

use crate::models::TAG_MAX_LEN;

/// Normalize a raw tag string: lowercase, spaces replaced with hyphens.
///
/// Normalization deliberately does not trim, so `" My Tag "` becomes
/// `"-my-tag-"`.
pub fn normalize_tag(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "-")
}

/// Validate a raw tag string before normalization.
///
/// Rules:
/// - Not empty
/// - At most [`TAG_MAX_LEN`] characters
pub fn validate_tag(raw: &str) -> std::result::Result<(), String> {
    if raw.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if raw.chars().count() > TAG_MAX_LEN {
        return Err(format!(
            "Tag name must be {} characters or less",
            TAG_MAX_LEN
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_tag("Work"), "work");
        assert_eq!(normalize_tag("WORK"), "work");
    }

    #[test]
    fn test_normalize_replaces_spaces_with_hyphens() {
        assert_eq!(normalize_tag("my tag"), "my-tag");
        assert_eq!(normalize_tag("a b c"), "a-b-c");
    }

    #[test]
    fn test_normalize_does_not_trim() {
        assert_eq!(normalize_tag(" My Tag "), "-my-tag-");
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize_tag("Deep Work");
        assert_eq!(normalize_tag(&once), once);
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(validate_tag("").is_err());
    }

    #[test]
    fn test_validate_rejects_overlong() {
        let long = "x".repeat(TAG_MAX_LEN + 1);
        assert!(validate_tag(&long).is_err());
        let max = "x".repeat(TAG_MAX_LEN);
        assert!(validate_tag(&max).is_ok());
    }
}
