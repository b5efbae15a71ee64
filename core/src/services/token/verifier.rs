//! Request-time access token verification

use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::token::TokenKind;
use crate::domain::value_objects::SubjectId;
use crate::errors::DomainError;

use super::codec::TokenCodec;

/// Turns an inbound access token into the authenticated subject
///
/// Stateless: it only needs the codec and never touches the refresh store,
/// so it is cheap to clone into middleware.
#[derive(Clone)]
pub struct SessionVerifier {
    codec: Arc<TokenCodec>,
}

impl SessionVerifier {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Authorizes a request by its access token
    ///
    /// # Arguments
    ///
    /// * `raw_access_token` - Token taken from the request, if any
    ///
    /// # Returns
    ///
    /// * `Ok(SubjectId)` - The token is a valid access token
    /// * `Err(DomainError::Unauthorized)` - Absent, empty or invalid token
    pub fn authorize(&self, raw_access_token: Option<&str>) -> Result<SubjectId, DomainError> {
        let token = match raw_access_token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => {
                debug!("Rejected request without access token");
                return Err(DomainError::Unauthorized);
            }
        };

        self.codec
            .verify(token, TokenKind::Access)
            .map(|claims| claims.subject())
            .map_err(|reason| {
                debug!(%reason, "Rejected access token");
                DomainError::from_token_rejection(reason)
            })
    }
}
