//! # Infrastructure Layer
//!
//! Concrete persistence for the Turnstile core: MySQL implementations of
//! the user and refresh token repositories, built on SQLx, plus connection
//! pool management and schema migrations.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use ts_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Infrastructure-specific error types
///
/// Used for setup work (pool creation, migrations). Repository calls report
/// failures as `DomainError::Storage` instead.
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
