//! # Turnstile Core
//!
//! Core business logic and domain layer for the Turnstile backend.
//! This crate contains domain entities, the token lifecycle services,
//! the account service, repository interfaces, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
