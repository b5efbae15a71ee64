//! Business services containing domain logic and use cases.

pub mod account;
pub mod token;

// Re-export commonly used types
pub use account::{AccountService, AccountServiceConfig, AuthSession};
pub use token::{
    CleanupResult, SessionVerifier, TokenCleanupConfig, TokenCleanupService, TokenCodec,
    TokenIssuer, TokenService, TokenServiceConfig,
};
