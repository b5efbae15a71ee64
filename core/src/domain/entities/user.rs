//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::SubjectId;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address, unique across users
    pub email: String,

    /// Nickname, unique across users
    pub nickname: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(email: String, nickname: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            nickname,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// The subject identifier tokens are issued to
    pub fn subject_id(&self) -> SubjectId {
        SubjectId::from(self.id)
    }

    pub fn set_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = nickname;
        self.updated_at = Utc::now();
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}
