use serde::{Deserialize, Serialize};
use ts_core::domain::entities::token::TokenPair;
use ts_shared::validation::{is_valid_nickname, NICKNAME_MAX_LENGTH, NICKNAME_MIN_LENGTH};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_nickname"))]
    pub nickname: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    /// Email address or nickname
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of the rotation endpoint; a missing token is rejected as unauthorized
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Token pair as returned by sign-up, sign-in and rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub access_expires_in: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
    pub user_id: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            access_expires_in: pair.access_expires_in,
            refresh_expires_in: pair.refresh_expires_in,
            user_id: pair.subject_id.to_string(),
        }
    }
}

pub(crate) fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if is_valid_nickname(nickname) {
        Ok(())
    } else {
        let mut error = ValidationError::new("nickname");
        error.message = Some(
            format!(
                "Nickname must be {}-{} latin letters",
                NICKNAME_MIN_LENGTH, NICKNAME_MAX_LENGTH
            )
            .into(),
        );
        Err(error)
    }
}
