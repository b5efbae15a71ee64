//! Authentication configuration: token signing and refresh record upkeep

use serde::{Deserialize, Serialize};

use super::{parsed, Lookup};

const DEFAULT_ACCESS_SECRET: &str = "development-access-secret-please-change";
const DEFAULT_REFRESH_SECRET: &str = "development-refresh-secret-please-change";

/// JWT signing configuration
///
/// Access and refresh tokens are signed with separate secrets so that a
/// leaked secret of one kind cannot be used to mint tokens of the other.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,

    /// Secret used to sign refresh tokens
    pub refresh_secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from(DEFAULT_ACCESS_SECRET),
            refresh_secret: String::from(DEFAULT_REFRESH_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("turnstile"),
            audience: String::from("turnstile-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with both signing secrets
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if either default secret is still in place (security warning)
    pub fn is_using_default_secrets(&self) -> bool {
        self.access_secret == DEFAULT_ACCESS_SECRET || self.refresh_secret == DEFAULT_REFRESH_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// How often expired refresh records are purged, in seconds (0 disables)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

impl AuthConfig {
    /// Reads the `JWT_*` variables and `TOKEN_CLEANUP_INTERVAL`
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: Lookup<'_>) -> Self {
        let defaults = JwtConfig::default();

        Self {
            jwt: JwtConfig {
                access_secret: lookup("JWT_ACCESS_SECRET").unwrap_or(defaults.access_secret),
                refresh_secret: lookup("JWT_REFRESH_SECRET").unwrap_or(defaults.refresh_secret),
                access_token_expiry: parsed(lookup, "JWT_ACCESS_TOKEN_EXPIRY")
                    .unwrap_or(defaults.access_token_expiry),
                refresh_token_expiry: parsed(lookup, "JWT_REFRESH_TOKEN_EXPIRY")
                    .unwrap_or(defaults.refresh_token_expiry),
                issuer: lookup("JWT_ISSUER").unwrap_or(defaults.issuer),
                audience: lookup("JWT_AUDIENCE").unwrap_or(defaults.audience),
            },
            cleanup_interval: parsed(lookup, "TOKEN_CLEANUP_INTERVAL")
                .unwrap_or_else(default_cleanup_interval),
        }
    }
}

fn default_cleanup_interval() -> u64 {
    3600 // 1 hour
}
