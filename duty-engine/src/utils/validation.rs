//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::manager::{EngineError, EngineResult};

// ── Text length limits ──────────────────────────────────────────────

/// Resident names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, issue descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Flat numbers, phone numbers, WhatsApp ids
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Message templates, custom reminder text, announcement bodies
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::Validation(format!("{field} must not be empty")));
    }
    validate_text_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> EngineResult<()> {
    match value {
        Some(v) => validate_text_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Minimal shape check; deliverability is the mail channel's concern.
pub fn validate_email(value: &str) -> EngineResult<()> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !trimmed.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(EngineError::Validation(format!(
            "email is not a valid address: {trimmed}"
        ))),
    }
}

/// Validate only the length (empty is fine).
pub fn validate_text_len(value: &str, field: &str, max_len: usize) -> EngineResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(EngineError::Validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Trim and cut to `max_len` chars (for entry points that must not fail).
pub fn clamp_text(value: &str, max_len: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }
    trimmed.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Ann", "name", MAX_NAME_LEN).is_ok());
        assert!(matches!(
            validate_required_text("   ", "name", MAX_NAME_LEN),
            Err(EngineError::Validation(_))
        ));
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let name = "é".repeat(MAX_SHORT_TEXT_LEN);
        assert!(validate_required_text(&name, "flat_number", MAX_SHORT_TEXT_LEN).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "notes", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_clamp_text() {
        assert_eq!(clamp_text("  Ann  ", MAX_NAME_LEN), "Ann");
        let clamped = clamp_text(&"é".repeat(MAX_NOTE_LEN + 10), MAX_NOTE_LEN);
        assert_eq!(clamped.chars().count(), MAX_NOTE_LEN);
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("owner@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_email("").is_err());
    }
}
