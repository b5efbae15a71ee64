//! Token entities for JWT-based session credentials.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::value_objects::SubjectId;

/// The two kinds of credential the service issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, stateless credential presented on every request
    Access,
    /// Long-lived credential exchangeable for a new token pair, once
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, unique per token so that two tokens minted in the same
    /// second for the same subject never collide
    pub jti: String,

    /// Token kind
    pub typ: TokenKind,
}

impl Claims {
    /// Creates new claims valid from now for `lifetime`
    ///
    /// # Arguments
    ///
    /// * `subject` - The principal the token is issued to
    /// * `kind` - Access or refresh
    /// * `lifetime` - How long the token stays valid
    /// * `issuer` - Value of the `iss` claim
    /// * `audience` - Value of the `aud` claim
    pub fn new(
        subject: &SubjectId,
        kind: TokenKind,
        lifetime: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: subject.as_str().to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
            typ: kind,
        }
    }

    /// Checks if the claims have expired
    ///
    /// A token stays valid up to and including the second named by `exp`.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Gets the subject identifier from the claims
    pub fn subject(&self) -> SubjectId {
        SubjectId::new(self.sub.clone())
    }
}

/// Server-side record of the single refresh token currently valid for a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    /// Subject owning the refresh token
    pub subject_id: SubjectId,

    /// SHA-256 digest of the raw refresh token, lowercase hex
    pub token_hash: String,

    /// Timestamp when the record was written
    pub created_at: DateTime<Utc>,

    /// Expiry copied from the refresh token's `exp` claim
    pub expires_at: DateTime<Utc>,
}

impl RefreshRecord {
    /// Creates a record for a freshly signed refresh token
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Owner of the token
    /// * `raw_token` - The signed refresh token; only its digest is kept
    /// * `expires_at` - When the token stops being valid
    pub fn new(subject_id: SubjectId, raw_token: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject_id,
            token_hash: Self::digest(raw_token),
            created_at: Utc::now(),
            expires_at,
        }
    }

    /// Hashes a raw token for storage and lookup
    pub fn digest(raw_token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw_token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Checks if the refresh record has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks whether this record was written for the given raw token
    pub fn matches(&self, raw_token: &str) -> bool {
        self.token_hash == Self::digest(raw_token)
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Subject the pair was issued to
    pub subject_id: SubjectId,

    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> SubjectId {
        SubjectId::new("u1")
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(
            &subject(),
            TokenKind::Access,
            Duration::minutes(15),
            "turnstile",
            "turnstile-api",
        );

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.nbf, claims.iat);
        assert!(!claims.is_expired());
        assert_eq!(claims.subject(), subject());
    }

    #[test]
    fn test_claims_jti_is_unique() {
        let a = Claims::new(&subject(), TokenKind::Refresh, Duration::days(7), "i", "a");
        let b = Claims::new(&subject(), TokenKind::Refresh, Duration::days(7), "i", "a");

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new(&subject(), TokenKind::Access, Duration::minutes(1), "i", "a");
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
    }

    #[test]
    fn test_token_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TokenKind::Refresh).unwrap(), "\"refresh\"");
        assert_eq!(TokenKind::Access.to_string(), "access");
    }

    #[test]
    fn test_refresh_record_digest() {
        let record = RefreshRecord::new(subject(), "raw-token", Utc::now() + Duration::days(7));

        assert_eq!(record.token_hash.len(), 64);
        assert!(record.token_hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!record.token_hash.contains("raw-token"));
        assert!(record.matches("raw-token"));
        assert!(!record.matches("other-token"));
        assert!(!record.is_expired());
    }

    #[test]
    fn test_refresh_record_expiration() {
        let mut record = RefreshRecord::new(subject(), "raw", Utc::now() + Duration::days(1));
        record.expires_at = Utc::now() - Duration::seconds(1);

        assert!(record.is_expired());
    }
}
