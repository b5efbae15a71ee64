//! Login identifier value object.

use ts_shared::validation::is_valid_email;

/// How a sign-in request identifies the account
///
/// The mode is decided from the shape of the login string up front; a
/// malformed email is never retried as a nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Nickname(String),
}

impl LoginIdentifier {
    /// Classifies a login string
    ///
    /// Anything containing `@` is treated as an email address and must be a
    /// valid one; everything else is a nickname.
    ///
    /// # Returns
    /// * `Some(LoginIdentifier)` - The lookup mode to use
    /// * `None` - The string contains `@` but is not a valid email, or is empty
    pub fn parse(login: &str) -> Option<Self> {
        let login = login.trim();
        if login.is_empty() {
            return None;
        }
        if login.contains('@') {
            return is_valid_email(login).then(|| LoginIdentifier::Email(login.to_lowercase()));
        }
        Some(LoginIdentifier::Nickname(login.to_string()))
    }
}
