//! Credential codec: signs and verifies access and refresh tokens

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, TokenKind};
use crate::domain::value_objects::SubjectId;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs and verifies tokens with one HS256 secret per token kind
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct TokenCodec {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    issuer: String,
    audience: String,
}

impl TokenCodec {
    /// Creates a codec from the service configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Secrets, lifetimes, issuer and audience
    ///
    /// # Returns
    ///
    /// * `Ok(TokenCodec)` - Ready to sign and verify
    /// * `Err(DomainError::Internal)` - Secrets empty or equal, or a
    ///   non-positive lifetime
    pub fn new(config: &TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Ok(Self {
            access: KeyPair::from_secret(&config.access_secret),
            refresh: KeyPair::from_secret(&config.refresh_secret),
            validation,
            access_lifetime: Duration::seconds(config.access_token_expiry_seconds),
            refresh_lifetime: Duration::seconds(config.refresh_token_expiry_seconds),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Lifetime of a token of the given kind
    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_lifetime,
            TokenKind::Refresh => self.refresh_lifetime,
        }
    }

    /// Signs a new token for `subject`
    ///
    /// # Arguments
    ///
    /// * `subject` - Principal the token is issued to
    /// * `kind` - Selects the secret, the lifetime and the `typ` claim
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The encoded token
    /// * `Err(TokenError::SigningFailed)` - Encoding failed
    pub fn sign(&self, subject: &SubjectId, kind: TokenKind) -> Result<String, TokenError> {
        self.sign_with_claims(subject, kind).map(|(token, _)| token)
    }

    /// Signs a new token and also hands back the claims it carries
    pub(crate) fn sign_with_claims(
        &self,
        subject: &SubjectId,
        kind: TokenKind,
    ) -> Result<(String, Claims), TokenError> {
        let claims = Claims::new(
            subject,
            kind,
            self.lifetime(kind),
            &self.issuer,
            &self.audience,
        );
        let token = self.sign_claims(&claims, kind)?;
        Ok((token, claims))
    }

    /// Encodes arbitrary claims with the secret of `key_kind`
    pub(crate) fn sign_claims(&self, claims: &Claims, key_kind: TokenKind) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys(key_kind).encoding)
            .map_err(|_| TokenError::SigningFailed)
    }

    /// Verifies a token of the expected kind and returns its claims
    ///
    /// Checks signature, structure, issuer, audience, expiry, not-before and
    /// the `typ` claim. Never panics on untrusted input.
    ///
    /// # Arguments
    ///
    /// * `token` - Raw token as presented by the client
    /// * `kind` - Kind the caller expects
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Expired, bad signature, bad claims, malformed or
    ///   wrong kind
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims,
                _ => TokenError::Malformed,
            })?;

        let claims = data.claims;
        if claims.typ != kind {
            return Err(TokenError::WrongKind);
        }
        if claims.sub.is_empty() {
            return Err(TokenError::InvalidClaims);
        }

        Ok(claims)
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}
