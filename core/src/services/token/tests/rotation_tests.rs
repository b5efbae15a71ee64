//! Tests for single-use refresh token rotation

use std::sync::Arc;

use crate::domain::entities::token::{RefreshRecord, TokenKind};
use crate::domain::value_objects::SubjectId;
use crate::errors::DomainError;
use crate::repositories::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
use crate::services::token::TokenService;

use super::mocks::{test_config, FlakyRefreshTokenRepository};

fn service() -> TokenService<InMemoryRefreshTokenRepository> {
    TokenService::new(Arc::new(InMemoryRefreshTokenRepository::new()), test_config()).unwrap()
}

#[tokio::test]
async fn test_rotation_scenario() {
    let service = service();
    let subject = SubjectId::new("u1");

    let first = service.issue(&subject).await.unwrap();
    let second = service.rotate(&first.refresh_token).await.unwrap();

    assert_eq!(second.subject_id, subject);
    assert_ne!(first.refresh_token, second.refresh_token);
    assert_ne!(first.access_token, second.access_token);
    assert_eq!(service.authorize(Some(&second.access_token)).unwrap(), subject);

    // r1 is consumed
    assert!(matches!(
        service.rotate(&first.refresh_token).await,
        Err(DomainError::Unauthorized)
    ));

    // r2 still works, once
    let third = service.rotate(&second.refresh_token).await.unwrap();
    assert!(matches!(
        service.rotate(&second.refresh_token).await,
        Err(DomainError::Unauthorized)
    ));
    assert!(service.rotate(&third.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_rotate_rejects_access_token() {
    let service = service();
    let pair = service.issue(&SubjectId::new("u1")).await.unwrap();

    assert!(matches!(
        service.rotate(&pair.access_token).await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_rotate_rejects_garbage() {
    let service = service();

    for token in ["", "garbage-string", "a.b.c"] {
        assert!(matches!(service.rotate(token).await, Err(DomainError::Unauthorized)));
    }
}

#[tokio::test]
async fn test_rotate_rejects_valid_but_unrecorded_token() {
    let service = service();

    // Correctly signed, never recorded in the store
    let refresh = service.codec.sign(&SubjectId::new("u1"), TokenKind::Refresh).unwrap();

    assert!(matches!(service.rotate(&refresh).await, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_rotate_rejects_record_owned_by_another_subject() {
    let repo = Arc::new(InMemoryRefreshTokenRepository::new());
    let service = TokenService::new(Arc::clone(&repo), test_config()).unwrap();

    let refresh = service.codec.sign(&SubjectId::new("u1"), TokenKind::Refresh).unwrap();
    let record = RefreshRecord::new(SubjectId::new("u2"), &refresh, chrono::Utc::now() + chrono::Duration::days(1));
    repo.upsert(record).await.unwrap();

    assert!(matches!(service.rotate(&refresh).await, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_invalid_token_does_not_reach_the_store() {
    let repo = Arc::new(FlakyRefreshTokenRepository::default());
    let service = TokenService::new(Arc::clone(&repo), test_config()).unwrap();
    repo.set_down(true);

    // A store call would surface as Storage
    assert!(matches!(
        service.rotate("garbage-string").await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_rotate_storage_outage_surfaces_as_storage_error() {
    let repo = Arc::new(FlakyRefreshTokenRepository::default());
    let service = TokenService::new(Arc::clone(&repo), test_config()).unwrap();

    let pair = service.issue(&SubjectId::new("u1")).await.unwrap();
    repo.set_down(true);

    assert!(matches!(
        service.rotate(&pair.refresh_token).await,
        Err(DomainError::Storage { .. })
    ));

    // The token was not consumed by the failed attempt
    repo.set_down(false);
    assert!(service.rotate(&pair.refresh_token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_exactly_one_winner() {
    let service = Arc::new(service());
    let pair = service.issue(&SubjectId::new("u1")).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let refresh = pair.refresh_token.clone();
        handles.push(tokio::spawn(async move { service.rotate(&refresh).await }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(pair) => winners.push(pair),
            Err(e) => assert!(matches!(e, DomainError::Unauthorized)),
        }
    }

    assert_eq!(winners.len(), 1);
    assert!(service.rotate(&winners[0].refresh_token).await.is_ok());
}
