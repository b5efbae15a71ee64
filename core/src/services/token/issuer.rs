//! Token issuer: mints token pairs and records the refresh half

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::token::{Claims, RefreshRecord, TokenKind, TokenPair};
use crate::domain::value_objects::SubjectId;
use crate::errors::DomainError;
use crate::repositories::RefreshTokenRepository;

use super::codec::TokenCodec;

/// Produces matched access/refresh pairs and keeps the store in step
pub struct TokenIssuer<R: RefreshTokenRepository> {
    codec: Arc<TokenCodec>,
    repository: Arc<R>,
}

impl<R: RefreshTokenRepository> TokenIssuer<R> {
    pub fn new(codec: Arc<TokenCodec>, repository: Arc<R>) -> Self {
        Self { codec, repository }
    }

    /// Issues a fresh pair, replacing whatever refresh record `subject` had
    ///
    /// Exactly one store write. When it fails no pair is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The new pair
    /// * `Err(DomainError::Storage)` - The record could not be written
    /// * `Err(DomainError::Token(SigningFailed))` - Encoding failed
    pub async fn issue(&self, subject: &SubjectId) -> Result<TokenPair, DomainError> {
        let (pair, record) = self.mint(subject)?;
        self.repository.upsert(record).await?;

        debug!(subject = %subject, "Issued token pair");
        Ok(pair)
    }

    /// Issues a fresh pair in exchange for a consumed refresh token
    ///
    /// The subject's record is replaced only if it still holds
    /// `consumed_hash`; the swap is atomic in the store.
    ///
    /// # Arguments
    ///
    /// * `subject` - Owner of the consumed token
    /// * `consumed_hash` - Digest of the refresh token being exchanged
    ///
    /// # Returns
    ///
    /// * `Ok(Some(TokenPair))` - Rotation won
    /// * `Ok(None)` - The record moved on (concurrent rotation or re-issue)
    /// * `Err(DomainError)` - Storage or signing failure
    pub async fn reissue(
        &self,
        subject: &SubjectId,
        consumed_hash: &str,
    ) -> Result<Option<TokenPair>, DomainError> {
        let (pair, record) = self.mint(subject)?;

        if !self.repository.replace(consumed_hash, record).await? {
            debug!(subject = %subject, "Refresh record changed before rotation completed");
            return Ok(None);
        }

        debug!(subject = %subject, "Rotated token pair");
        Ok(Some(pair))
    }

    fn mint(&self, subject: &SubjectId) -> Result<(TokenPair, RefreshRecord), DomainError> {
        let (access_token, _) = self
            .codec
            .sign_with_claims(subject, TokenKind::Access)
            .map_err(DomainError::from_token_rejection)?;
        let (refresh_token, refresh_claims) = self
            .codec
            .sign_with_claims(subject, TokenKind::Refresh)
            .map_err(DomainError::from_token_rejection)?;

        let record = RefreshRecord::new(subject.clone(), &refresh_token, expiry_of(&refresh_claims)?);
        let pair = TokenPair {
            subject_id: subject.clone(),
            access_token,
            refresh_token,
            access_expires_in: self.codec.lifetime(TokenKind::Access).num_seconds(),
            refresh_expires_in: self.codec.lifetime(TokenKind::Refresh).num_seconds(),
        };

        Ok((pair, record))
    }
}

fn expiry_of(claims: &Claims) -> Result<chrono::DateTime<Utc>, DomainError> {
    Utc.timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| DomainError::Internal {
            message: "Invalid expiry timestamp".to_string(),
        })
}
