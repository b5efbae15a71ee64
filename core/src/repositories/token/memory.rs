//! In-memory implementation of RefreshTokenRepository
//!
//! Used by tests and by the API server when no database is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::RefreshRecord;
use crate::domain::value_objects::SubjectId;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenRepository;

#[derive(Default)]
struct Records {
    by_subject: HashMap<SubjectId, RefreshRecord>,
    // token_hash -> owning subject
    by_hash: HashMap<String, SubjectId>,
}

impl Records {
    fn put(&mut self, record: RefreshRecord) {
        if let Some(previous) = self.by_subject.remove(&record.subject_id) {
            self.by_hash.remove(&previous.token_hash);
        }
        self.by_hash
            .insert(record.token_hash.clone(), record.subject_id.clone());
        self.by_subject.insert(record.subject_id.clone(), record);
    }
}

/// In-memory refresh token repository
///
/// Both indexes sit behind one lock, so `replace` compares and swaps under
/// a single write guard.
#[derive(Clone, Default)]
pub struct InMemoryRefreshTokenRepository {
    records: Arc<RwLock<Records>>,
}

impl InMemoryRefreshTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.by_subject.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn upsert(&self, record: RefreshRecord) -> Result<RefreshRecord, DomainError> {
        let mut records = self.records.write().await;
        records.put(record.clone());
        Ok(record)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .by_hash
            .get(token_hash)
            .and_then(|subject| records.by_subject.get(subject))
            .cloned())
    }

    async fn find_by_subject(&self, subject_id: &SubjectId) -> Result<Option<RefreshRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.by_subject.get(subject_id).cloned())
    }

    async fn replace(&self, expected_hash: &str, record: RefreshRecord) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;

        let holds_expected = records
            .by_subject
            .get(&record.subject_id)
            .is_some_and(|current| current.token_hash == expected_hash);
        if !holds_expected {
            return Ok(false);
        }

        records.put(record);
        Ok(true)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;

        let expired: Vec<SubjectId> = records
            .by_subject
            .values()
            .filter(|r| r.is_expired())
            .map(|r| r.subject_id.clone())
            .collect();

        for subject in &expired {
            if let Some(record) = records.by_subject.remove(subject) {
                records.by_hash.remove(&record.token_hash);
            }
        }

        Ok(expired.len())
    }
}
