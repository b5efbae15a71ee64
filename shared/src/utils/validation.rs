//! Validation rules for account fields
//!
//! Both the HTTP DTOs and the account service check input against these
//! rules, so they live here rather than in either layer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum nickname length
pub const NICKNAME_MIN_LENGTH: usize = 6;

/// Maximum nickname length
pub const NICKNAME_MAX_LENGTH: usize = 32;

/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 8;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static NICKNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("nickname pattern compiles"));

/// Check if a string is a plausible email address
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Check if a nickname consists of latin letters only and has an allowed length
pub fn is_valid_nickname(value: &str) -> bool {
    let len = value.chars().count();
    (NICKNAME_MIN_LENGTH..=NICKNAME_MAX_LENGTH).contains(&len) && NICKNAME_REGEX.is_match(value)
}

/// Check if a password is long enough
pub fn is_valid_password(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
    }

    #[test]
    fn test_nickname_validation() {
        assert!(is_valid_nickname("Gandalf"));
        assert!(!is_valid_nickname("short"));
        assert!(!is_valid_nickname("with space"));
        assert!(!is_valid_nickname("digits123"));
        assert!(!is_valid_nickname(&"a".repeat(NICKNAME_MAX_LENGTH + 1)));
    }

    #[test]
    fn test_password_validation() {
        assert!(is_valid_password("12345678"));
        assert!(!is_valid_password("1234567"));
    }
}
