//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {field} is already in use")]
    Conflict { field: String },

    /// Flow-level rejection of a credential; carries no detail on purpose
    #[error("Unauthorized access")]
    Unauthorized,

    /// Persistence layer unavailable or failing; a server fault, never a 401
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Shorthand for wrapping a storage failure
    pub fn storage(message: impl Into<String>) -> Self {
        DomainError::Storage {
            message: message.into(),
        }
    }

    /// Escalates a codec failure to the flow boundary
    ///
    /// Every verification failure becomes `Unauthorized`; signing failures
    /// are server faults and pass through unchanged.
    pub fn from_token_rejection(error: TokenError) -> Self {
        if error.is_rejection() {
            DomainError::Unauthorized
        } else {
            DomainError::Token(error)
        }
    }

    /// Whether the error is caused by the client rather than the server
    pub fn is_client_error(&self) -> bool {
        match self {
            DomainError::Validation { .. }
            | DomainError::NotFound { .. }
            | DomainError::Conflict { .. }
            | DomainError::Unauthorized
            | DomainError::Auth(_) => true,
            DomainError::Token(e) => e.is_rejection(),
            DomainError::Storage { .. } | DomainError::Internal { .. } => false,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
