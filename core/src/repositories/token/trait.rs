//! Refresh token repository trait defining the interface for refresh record persistence.

use async_trait::async_trait;

use crate::domain::entities::token::RefreshRecord;
use crate::domain::value_objects::SubjectId;
use crate::errors::DomainError;

/// Repository trait for RefreshRecord persistence operations
///
/// Holds at most one record per subject. Raw tokens never reach the store;
/// records are looked up by the SHA-256 digest of the raw token.
///
/// Every method returns `DomainError::Storage` when the backing store is
/// unavailable. Implementations must never report an outage as "not found".
///
/// # Atomicity
/// `upsert` and `replace` must each be atomic for a single subject's record.
/// `replace` is a compare-and-replace: when two callers race to replace the
/// same record, at most one of them observes the expected hash and wins.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Insert the record, replacing whatever record the subject had before
    ///
    /// # Arguments
    /// * `record` - The record for a freshly issued refresh token
    ///
    /// # Returns
    /// * `Ok(RefreshRecord)` - The stored record
    /// * `Err(DomainError)` - Storage failure
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use ts_core::repositories::RefreshTokenRepository;
    /// # use ts_core::domain::entities::token::RefreshRecord;
    /// # use ts_core::domain::value_objects::SubjectId;
    /// # async fn example(repo: &impl RefreshTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = RefreshRecord::new(
    ///     SubjectId::new("u1"),
    ///     "signed.refresh.token",
    ///     Utc::now() + Duration::days(7),
    /// );
    /// repo.upsert(record).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn upsert(&self, record: RefreshRecord) -> Result<RefreshRecord, DomainError>;

    /// Find a record by the digest of its raw token
    ///
    /// # Returns
    /// * `Ok(Some(RefreshRecord))` - The token is the subject's current one
    /// * `Ok(None)` - Unknown, superseded or already rotated token
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshRecord>, DomainError>;

    /// Find the current record of a subject
    async fn find_by_subject(&self, subject_id: &SubjectId) -> Result<Option<RefreshRecord>, DomainError>;

    /// Replace the subject's record only if it still holds `expected_hash`
    ///
    /// # Arguments
    /// * `expected_hash` - Digest of the refresh token being consumed
    /// * `record` - Replacement; its `subject_id` selects the record
    ///
    /// # Returns
    /// * `Ok(true)` - The record was replaced
    /// * `Ok(false)` - The subject's record no longer holds `expected_hash`
    /// * `Err(DomainError)` - Storage failure
    async fn replace(&self, expected_hash: &str, record: RefreshRecord) -> Result<bool, DomainError>;

    /// Delete records whose refresh token has expired
    ///
    /// Housekeeping only; an expired token already fails verification.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_expired(&self) -> Result<usize, DomainError>;

    /// Find a record by raw token value
    async fn find_by_raw_token(&self, raw_token: &str) -> Result<Option<RefreshRecord>, DomainError> {
        self.find_by_token_hash(&RefreshRecord::digest(raw_token)).await
    }
}
