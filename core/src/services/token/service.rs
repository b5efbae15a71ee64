//! Token service facade used by the HTTP layer

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::entities::token::{RefreshRecord, TokenKind, TokenPair};
use crate::domain::value_objects::SubjectId;
use crate::errors::DomainError;
use crate::repositories::RefreshTokenRepository;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::verifier::SessionVerifier;

/// Service for issuing, verifying and rotating session tokens
pub struct TokenService<R: RefreshTokenRepository> {
    pub(crate) codec: Arc<TokenCodec>,
    repository: Arc<R>,
    issuer: TokenIssuer<R>,
    verifier: SessionVerifier,
}

impl<R: RefreshTokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh token store
    /// * `config` - Signing secrets and lifetimes
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance or error if the configuration is unusable
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        let codec = Arc::new(TokenCodec::new(&config)?);

        Ok(Self {
            issuer: TokenIssuer::new(Arc::clone(&codec), Arc::clone(&repository)),
            verifier: SessionVerifier::new(Arc::clone(&codec)),
            codec,
            repository,
        })
    }

    /// Issues a new token pair for a subject
    ///
    /// Any refresh token previously issued to the subject stops working.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The generated token pair
    /// * `Err(DomainError::Storage)` - The refresh record could not be stored
    pub async fn issue(&self, subject: &SubjectId) -> Result<TokenPair, DomainError> {
        self.issuer.issue(subject).await
    }

    /// Authorizes a request by its access token
    pub fn authorize(&self, raw_access_token: Option<&str>) -> Result<SubjectId, DomainError> {
        self.verifier.authorize(raw_access_token)
    }

    /// Exchanges a refresh token for a new pair, consuming it
    ///
    /// # Arguments
    ///
    /// * `raw_refresh_token` - The refresh token presented by the client
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New token pair; the presented token is now dead
    /// * `Err(DomainError::Unauthorized)` - Invalid, expired, superseded or
    ///   already rotated token, or a lost race with a concurrent rotation
    /// * `Err(DomainError::Storage)` - The store could not be reached
    pub async fn rotate(&self, raw_refresh_token: &str) -> Result<TokenPair, DomainError> {
        let claims = self
            .codec
            .verify(raw_refresh_token, TokenKind::Refresh)
            .map_err(|reason| {
                debug!(%reason, "Rejected refresh token");
                DomainError::from_token_rejection(reason)
            })?;
        let subject = claims.subject();

        let record = self
            .repository
            .find_by_token_hash(&RefreshRecord::digest(raw_refresh_token))
            .await?
            .filter(|record| record.subject_id == subject)
            .ok_or_else(|| {
                info!(subject = %subject, "Refresh token is not the subject's current one");
                DomainError::Unauthorized
            })?;

        self.issuer
            .reissue(&subject, &record.token_hash)
            .await?
            .ok_or_else(|| {
                info!(subject = %subject, "Refresh token lost a concurrent rotation");
                DomainError::Unauthorized
            })
    }

    /// Verifier sharing this service's codec, for request middleware
    pub fn verifier(&self) -> SessionVerifier {
        self.verifier.clone()
    }

    /// Removes expired refresh records from storage
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records cleaned up
    /// * `Err(DomainError::Storage)` - Cleanup failed
    pub async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        self.repository.delete_expired().await
    }
}
