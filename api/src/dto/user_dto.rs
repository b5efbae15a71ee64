use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_core::domain::entities::user::User;
use validator::Validate;

use super::auth_dto::validate_nickname;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEmailRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateNicknameRequest {
    #[validate(custom(function = "validate_nickname"))]
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            nickname: user.nickname,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
