//! Validation helpers for DTOs.

use validator::{ValidationError, ValidationErrors};

/// Inclusive username length bounds, counted in characters.
pub const USERNAME_MIN_CHARS: usize = 1;
/// Upper username length bound.
pub const USERNAME_MAX_CHARS: usize = 10;
/// Inclusive score range accepted from clients.
pub const SCORE_MIN: i32 = 0;
/// Upper score bound.
pub const SCORE_MAX: i32 = 1000;

/// Validates that a username is 1-10 characters long.
///
/// Length is counted in Unicode scalar values (`chars().count()`), so a name
/// in any script is measured the way the player typed it, not in bytes.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&length) {
        let mut err = ValidationError::new("username_length");
        err.message = Some(
            format!(
                "Username must be {}-{} characters (got {})",
                USERNAME_MIN_CHARS, USERNAME_MAX_CHARS, length
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a score lies inside the accepted range.
pub fn validate_score(score: i32) -> Result<(), ValidationError> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        let mut err = ValidationError::new("score_range");
        err.message = Some(
            format!(
                "Score must be between {} and {} (got {})",
                SCORE_MIN, SCORE_MAX, score
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Flattens field errors into one line per violated constraint, sorted for a
/// stable order regardless of map iteration.
pub fn constraint_messages(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("{} failed constraint `{}`", field, error.code)),
            }
        }
    }

    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("a").is_ok());
        assert!(validate_username("playerone").is_ok());
        assert!(validate_username("0123456789").is_ok()); // exactly 10
    }

    #[test]
    fn test_validate_username_invalid_length() {
        assert!(validate_username("").is_err()); // empty
        assert!(validate_username("01234567890").is_err()); // 11 chars
        assert!(validate_username("a very long username").is_err());
    }

    #[test]
    fn test_validate_username_counts_chars_not_bytes() {
        // 10 characters, well over 10 bytes
        assert!(validate_username("ääääääääää").is_ok());
        assert!(validate_username("äääääääääää").is_err()); // 11 chars
    }

    #[test]
    fn test_validate_username_message_names_the_constraint() {
        let err = validate_username("").unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("Username must be 1-10 characters (got 0)")
        );
    }

    #[test]
    fn test_validate_score_valid() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(500).is_ok());
        assert!(validate_score(1000).is_ok());
    }

    #[test]
    fn test_validate_score_out_of_range() {
        assert!(validate_score(-1).is_err());
        assert!(validate_score(1001).is_err());
        assert!(validate_score(i32::MAX).is_err());
    }

    #[test]
    fn test_validate_score_message_names_the_constraint() {
        let err = validate_score(1001).unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("Score must be between 0 and 1000 (got 1001)")
        );
    }

    #[test]
    fn test_constraint_messages_joins_sorted_lines() {
        let mut errors = ValidationErrors::new();
        errors.add("username", validate_username("").unwrap_err());
        errors.add("score", validate_score(-5).unwrap_err());

        assert_eq!(
            constraint_messages(&errors),
            "Score must be between 0 and 1000 (got -5); Username must be 1-10 characters (got 0)"
        );
    }
}
