//! Unit tests for the credential codec

use chrono::{Duration, Utc};

use crate::domain::entities::token::{Claims, TokenKind};
use crate::domain::value_objects::SubjectId;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenCodec, TokenServiceConfig};

use super::mocks::test_config;

fn codec() -> TokenCodec {
    TokenCodec::new(&test_config()).unwrap()
}

fn subject() -> SubjectId {
    SubjectId::new("u1")
}

#[test]
fn test_sign_and_verify_both_kinds() {
    let codec = codec();

    for kind in [TokenKind::Access, TokenKind::Refresh] {
        let token = codec.sign(&subject(), kind).unwrap();
        let claims = codec.verify(&token, kind).unwrap();

        assert_eq!(claims.subject(), subject());
        assert_eq!(claims.typ, kind);
        assert_eq!(claims.iss, "turnstile");
        assert_eq!(claims.aud, "turnstile-api");
        assert_eq!(claims.exp - claims.iat, codec.lifetime(kind).num_seconds());
    }
}

#[test]
fn test_default_lifetimes() {
    let codec = codec();

    assert_eq!(codec.lifetime(TokenKind::Access), Duration::minutes(15));
    assert_eq!(codec.lifetime(TokenKind::Refresh), Duration::days(7));
}

#[test]
fn test_tokens_signed_in_the_same_second_differ() {
    let codec = codec();

    let first = codec.sign(&subject(), TokenKind::Refresh).unwrap();
    let second = codec.sign(&subject(), TokenKind::Refresh).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_kinds_are_not_interchangeable() {
    let codec = codec();

    let access = codec.sign(&subject(), TokenKind::Access).unwrap();
    let refresh = codec.sign(&subject(), TokenKind::Refresh).unwrap();

    // Different secrets: the signature check fails first
    assert_eq!(codec.verify(&access, TokenKind::Refresh), Err(TokenError::InvalidSignature));
    assert_eq!(codec.verify(&refresh, TokenKind::Access), Err(TokenError::InvalidSignature));
}

#[test]
fn test_typ_claim_is_checked_even_with_the_right_key() {
    let codec = codec();
    let claims = Claims::new(
        &subject(),
        TokenKind::Access,
        Duration::minutes(15),
        "turnstile",
        "turnstile-api",
    );

    // Access claims signed with the refresh secret
    let token = codec.sign_claims(&claims, TokenKind::Refresh).unwrap();

    assert_eq!(codec.verify(&token, TokenKind::Refresh), Err(TokenError::WrongKind));
}

#[test]
fn test_expired_token_is_rejected() {
    let codec = codec();
    let mut claims = Claims::new(&subject(), TokenKind::Access, Duration::minutes(15), "turnstile", "turnstile-api");
    claims.iat = Utc::now().timestamp() - 120;
    claims.nbf = claims.iat;
    claims.exp = Utc::now().timestamp() - 60;

    let token = codec.sign_claims(&claims, TokenKind::Access).unwrap();

    assert_eq!(codec.verify(&token, TokenKind::Access), Err(TokenError::Expired));
}

#[test]
fn test_no_leeway_past_expiry() {
    let codec = codec();
    let mut claims = Claims::new(&subject(), TokenKind::Access, Duration::minutes(15), "turnstile", "turnstile-api");
    claims.iat = Utc::now().timestamp() - 30;
    claims.nbf = claims.iat;
    claims.exp = Utc::now().timestamp() - 2;

    let token = codec.sign_claims(&claims, TokenKind::Access).unwrap();

    assert_eq!(codec.verify(&token, TokenKind::Access), Err(TokenError::Expired));
}

#[test]
fn test_foreign_issuer_and_audience_are_rejected() {
    let codec = codec();

    let wrong_issuer = Claims::new(&subject(), TokenKind::Access, Duration::minutes(15), "someone-else", "turnstile-api");
    let token = codec.sign_claims(&wrong_issuer, TokenKind::Access).unwrap();
    assert_eq!(codec.verify(&token, TokenKind::Access), Err(TokenError::InvalidClaims));

    let wrong_audience = Claims::new(&subject(), TokenKind::Access, Duration::minutes(15), "turnstile", "other-api");
    let token = codec.sign_claims(&wrong_audience, TokenKind::Access).unwrap();
    assert_eq!(codec.verify(&token, TokenKind::Access), Err(TokenError::InvalidClaims));
}

#[test]
fn test_empty_subject_is_rejected() {
    let codec = codec();
    let claims = Claims::new(&SubjectId::new(""), TokenKind::Access, Duration::minutes(15), "turnstile", "turnstile-api");

    let token = codec.sign_claims(&claims, TokenKind::Access).unwrap();

    assert_eq!(codec.verify(&token, TokenKind::Access), Err(TokenError::InvalidClaims));
}

#[test]
fn test_token_from_another_secret_is_rejected() {
    let codec = codec();
    let forger = TokenCodec::new(&TokenServiceConfig {
        access_secret: "attacker-access".to_string(),
        refresh_secret: "attacker-refresh".to_string(),
        ..Default::default()
    })
    .unwrap();

    let forged = forger.sign(&subject(), TokenKind::Access).unwrap();

    assert_eq!(codec.verify(&forged, TokenKind::Access), Err(TokenError::InvalidSignature));
}

#[test]
fn test_garbage_input_never_panics() {
    let codec = codec();

    for input in ["", "garbage-string", "a.b.c", "....", "eyJhbGciOiJIUzI1NiJ9.e30.", "\u{0}\u{ffff}"] {
        let result = codec.verify(input, TokenKind::Access);
        assert!(matches!(result, Err(e) if e.is_rejection()), "input {:?}", input);
    }
}

#[test]
fn test_tampered_payload_is_rejected() {
    let codec = codec();
    let token = codec.sign(&subject(), TokenKind::Access).unwrap();
    let other = codec.sign(&SubjectId::new("u2"), TokenKind::Access).unwrap();

    // Splice u2's payload onto u1's signature
    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    assert_eq!(codec.verify(&tampered, TokenKind::Access), Err(TokenError::InvalidSignature));
}

#[test]
fn test_config_rejects_equal_or_empty_secrets() {
    let equal = TokenServiceConfig {
        access_secret: "same".to_string(),
        refresh_secret: "same".to_string(),
        ..Default::default()
    };
    assert!(matches!(TokenCodec::new(&equal), Err(DomainError::Internal { .. })));

    let empty = TokenServiceConfig {
        access_secret: String::new(),
        ..test_config()
    };
    assert!(matches!(TokenCodec::new(&empty), Err(DomainError::Internal { .. })));

    let no_lifetime = TokenServiceConfig {
        access_token_expiry_seconds: 0,
        ..test_config()
    };
    assert!(matches!(TokenCodec::new(&no_lifetime), Err(DomainError::Internal { .. })));
}
