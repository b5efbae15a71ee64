//! Configuration for the token service

use ts_shared::config::JwtConfig;

use crate::errors::DomainError;

/// Configuration for the token service
///
/// Loaded once at startup and moved into the codec; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,
    /// Secret used to sign refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_seconds: i64,
    /// Value of the `iss` claim
    pub issuer: String,
    /// Value of the `aud` claim
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            access_secret: jwt.access_secret.clone(),
            refresh_secret: jwt.refresh_secret.clone(),
            access_token_expiry_seconds: jwt.access_token_expiry,
            refresh_token_expiry_seconds: jwt.refresh_token_expiry,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
        }
    }
}

impl TokenServiceConfig {
    /// Check the configuration before any key is derived from it
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Secrets are present and distinct, lifetimes are positive
    /// * `Err(DomainError::Internal)` - Describes the first problem found
    pub fn validate(&self) -> Result<(), DomainError> {
        let problem = if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            Some("token signing secrets must not be empty")
        } else if self.access_secret == self.refresh_secret {
            Some("access and refresh tokens must use different secrets")
        } else if self.access_token_expiry_seconds <= 0 || self.refresh_token_expiry_seconds <= 0 {
            Some("token lifetimes must be positive")
        } else {
            None
        };

        match problem {
            Some(message) => Err(DomainError::Internal {
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }
}
