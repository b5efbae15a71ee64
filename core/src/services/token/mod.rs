//! Token lifecycle services
//!
//! This module handles all token-related operations including:
//! - Signing and verifying access and refresh tokens
//! - Issuing token pairs and recording refresh tokens
//! - Single-use refresh token rotation
//! - Background cleanup of expired refresh records

mod cleanup;
mod codec;
mod config;
mod issuer;
mod service;
mod verifier;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use service::TokenService;
pub use verifier::SessionVerifier;
