//! Error types for authentication and token operations
//!
//! Messages stay generic: they end up in HTTP responses and must not tell a
//! caller which part of a credential check failed.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// Unknown login or wrong password; deliberately indistinguishable
    #[error("Invalid login or password")]
    InvalidCredentials,
}

/// Codec-level token errors
///
/// Everything except `SigningFailed` is a verification failure of an
/// attacker-controllable input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Malformed token")]
    Malformed,

    #[error("Token kind mismatch")]
    WrongKind,

    #[error("Token generation failed")]
    SigningFailed,
}

impl TokenError {
    /// Whether this is a verification failure (as opposed to a server fault)
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TokenError::SigningFailed)
    }
}
