//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! One row per subject in `refresh_tokens`, keyed by `subject_id`. Only the
//! SHA-256 digest of a refresh token is ever written.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use ts_core::domain::entities::token::RefreshRecord;
use ts_core::domain::value_objects::SubjectId;
use ts_core::errors::DomainError;
use ts_core::repositories::RefreshTokenRepository;

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshRecord, DomainError> {
        let subject_id: String = row
            .try_get("subject_id")
            .map_err(|e| DomainError::storage(format!("Failed to get subject_id: {}", e)))?;

        Ok(RefreshRecord {
            subject_id: SubjectId::new(subject_id),
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| DomainError::storage(format!("Failed to get token_hash: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::storage(format!("Failed to get created_at: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::storage(format!("Failed to get expires_at: {}", e)))?,
        })
    }

    async fn find_one(&self, query: &str, key: &str) -> Result<Option<RefreshRecord>, DomainError> {
        let result = sqlx::query(query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find refresh record: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn upsert(&self, record: RefreshRecord) -> Result<RefreshRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (subject_id, token_hash, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                token_hash = VALUES(token_hash),
                created_at = VALUES(created_at),
                expires_at = VALUES(expires_at)
        "#;

        sqlx::query(query)
            .bind(record.subject_id.as_str())
            .bind(&record.token_hash)
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to save refresh record: {}", e)))?;

        Ok(record)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshRecord>, DomainError> {
        let query = r#"
            SELECT subject_id, token_hash, created_at, expires_at
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        self.find_one(query, token_hash).await
    }

    async fn find_by_subject(&self, subject_id: &SubjectId) -> Result<Option<RefreshRecord>, DomainError> {
        let query = r#"
            SELECT subject_id, token_hash, created_at, expires_at
            FROM refresh_tokens
            WHERE subject_id = ?
            LIMIT 1
        "#;

        self.find_one(query, subject_id.as_str()).await
    }

    async fn replace(&self, expected_hash: &str, record: RefreshRecord) -> Result<bool, DomainError> {
        // Single-row conditional update: of two racing callers only one
        // still matches the expected hash
        let query = r#"
            UPDATE refresh_tokens
            SET token_hash = ?, created_at = ?, expires_at = ?
            WHERE subject_id = ? AND token_hash = ?
        "#;

        let result = sqlx::query(query)
            .bind(&record.token_hash)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.subject_id.as_str())
            .bind(expected_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to replace refresh record: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let query = "DELETE FROM refresh_tokens WHERE expires_at < ?";

        let result = sqlx::query(query)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete expired records: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}
