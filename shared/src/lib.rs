//! Shared utilities and common types for the Turnstile server
//!
//! This crate provides common functionality used across all server crates:
//! - Configuration types loaded from the environment
//! - Error response payloads
//! - Input validation rules for account fields

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation;
