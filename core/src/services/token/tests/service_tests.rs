//! Unit tests for issuing and authorizing

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::token::{RefreshRecord, TokenKind};
use crate::domain::value_objects::SubjectId;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
use crate::services::token::{TokenCleanupConfig, TokenCleanupService, TokenService};

use super::mocks::{test_config, FlakyRefreshTokenRepository};

fn service() -> (TokenService<InMemoryRefreshTokenRepository>, Arc<InMemoryRefreshTokenRepository>) {
    let repo = Arc::new(InMemoryRefreshTokenRepository::new());
    let service = TokenService::new(Arc::clone(&repo), test_config()).unwrap();
    (service, repo)
}

#[tokio::test]
async fn test_issue_returns_pair_and_records_refresh_token() {
    let (service, repo) = service();
    let subject = SubjectId::new("u1");

    let pair = service.issue(&subject).await.unwrap();

    assert_eq!(pair.subject_id, subject);
    assert_ne!(pair.access_token, pair.refresh_token);
    assert_eq!(pair.access_expires_in, 900);
    assert_eq!(pair.refresh_expires_in, 604800);

    let record = repo.find_by_subject(&subject).await.unwrap().unwrap();
    assert!(record.matches(&pair.refresh_token));
    assert_ne!(record.token_hash, pair.refresh_token);
    assert!(record.expires_at > Utc::now() + Duration::days(6));
}

#[tokio::test]
async fn test_authorize_issued_access_token() {
    let (service, _) = service();
    let subject = SubjectId::new("u1");

    let pair = service.issue(&subject).await.unwrap();

    assert_eq!(service.authorize(Some(&pair.access_token)).unwrap(), subject);
    assert_eq!(service.verifier().authorize(Some(&pair.access_token)).unwrap(), subject);
}

#[tokio::test]
async fn test_authorize_rejects_refresh_token() {
    let (service, _) = service();
    let pair = service.issue(&SubjectId::new("u1")).await.unwrap();

    assert!(matches!(
        service.authorize(Some(&pair.refresh_token)),
        Err(DomainError::Unauthorized)
    ));
}

#[test]
fn test_authorize_rejects_missing_or_garbage_token() {
    let (service, _) = service();

    for token in [None, Some(""), Some("   "), Some("garbage-string")] {
        assert!(matches!(service.authorize(token), Err(DomainError::Unauthorized)));
    }
}

#[test]
fn test_authorize_rejects_expired_access_token() {
    let (service, _) = service();
    let mut claims = crate::domain::entities::token::Claims::new(
        &SubjectId::new("u1"),
        TokenKind::Access,
        Duration::minutes(15),
        "turnstile",
        "turnstile-api",
    );
    claims.iat = Utc::now().timestamp() - 1000;
    claims.nbf = claims.iat;
    claims.exp = Utc::now().timestamp() - 100;
    let token = service.codec.sign_claims(&claims, TokenKind::Access).unwrap();

    assert_eq!(service.codec.verify(&token, TokenKind::Access), Err(TokenError::Expired));
    assert!(matches!(service.authorize(Some(&token)), Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_second_issue_supersedes_first_refresh_token() {
    let (service, repo) = service();
    let subject = SubjectId::new("u1");

    let first = service.issue(&subject).await.unwrap();
    let second = service.issue(&subject).await.unwrap();

    assert_eq!(repo.len().await, 1);
    assert!(matches!(
        service.rotate(&first.refresh_token).await,
        Err(DomainError::Unauthorized)
    ));
    assert!(service.rotate(&second.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_access_tokens_survive_reissue() {
    let (service, _) = service();
    let subject = SubjectId::new("u1");

    let first = service.issue(&subject).await.unwrap();
    service.issue(&subject).await.unwrap();

    // Access tokens are stateless until they expire
    assert_eq!(service.authorize(Some(&first.access_token)).unwrap(), subject);
}

#[tokio::test]
async fn test_issue_storage_outage_surfaces_as_storage_error() {
    let repo = Arc::new(FlakyRefreshTokenRepository::default());
    let service = TokenService::new(Arc::clone(&repo), test_config()).unwrap();
    repo.set_down(true);

    let result = service.issue(&SubjectId::new("u1")).await;

    assert!(matches!(result, Err(DomainError::Storage { .. })));
}

#[tokio::test]
async fn test_authorize_does_not_need_the_store() {
    let repo = Arc::new(FlakyRefreshTokenRepository::default());
    let service = TokenService::new(Arc::clone(&repo), test_config()).unwrap();
    let subject = SubjectId::new("u1");

    let pair = service.issue(&subject).await.unwrap();
    repo.set_down(true);

    assert_eq!(service.authorize(Some(&pair.access_token)).unwrap(), subject);
}

#[tokio::test]
async fn test_cleanup_removes_expired_records() {
    let (service, repo) = service();

    let mut expired = RefreshRecord::new(SubjectId::new("gone"), "old", Utc::now() + Duration::days(1));
    expired.expires_at = Utc::now() - Duration::minutes(1);
    repo.upsert(expired).await.unwrap();
    service.issue(&SubjectId::new("u1")).await.unwrap();

    assert_eq!(service.cleanup_expired().await.unwrap(), 1);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_cleanup_service_cycle() {
    let repo = Arc::new(FlakyRefreshTokenRepository::default());
    let mut expired = RefreshRecord::new(SubjectId::new("gone"), "old", Utc::now() + Duration::days(1));
    expired.expires_at = Utc::now() - Duration::minutes(1);
    repo.inner.upsert(expired).await.unwrap();

    let cleanup = TokenCleanupService::new(Arc::clone(&repo), TokenCleanupConfig::default());
    let result = cleanup.run_cleanup().await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.expired_records_deleted, 1);

    repo.set_down(true);
    let result = cleanup.run_cleanup().await.unwrap();
    assert!(!result.is_success());
    assert_eq!(result.expired_records_deleted, 0);
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let repo = Arc::new(InMemoryRefreshTokenRepository::new());
    let mut expired = RefreshRecord::new(SubjectId::new("gone"), "old", Utc::now() + Duration::days(1));
    expired.expires_at = Utc::now() - Duration::minutes(1);
    repo.upsert(expired).await.unwrap();

    let config = TokenCleanupConfig::with_interval(0);
    assert!(!config.enabled);

    let cleanup = TokenCleanupService::new(Arc::clone(&repo), config);
    let result = cleanup.run_cleanup().await.unwrap();

    assert_eq!(result.expired_records_deleted, 0);
    assert_eq!(repo.len().await, 1);
}
