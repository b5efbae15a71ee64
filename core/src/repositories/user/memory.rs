//! In-memory implementation of UserRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// In-memory user repository
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_conflict(users: &HashMap<Uuid, User>, candidate: &User) -> Option<DomainError> {
    users.values().filter(|u| u.id != candidate.id).find_map(|u| {
        if u.email == candidate.email {
            Some(DomainError::Conflict {
                field: "email".to_string(),
            })
        } else if u.nickname == candidate.nickname {
            Some(DomainError::Conflict {
                field: "nickname".to_string(),
            })
        } else {
            None
        }
    })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.nickname == nickname).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if let Some(conflict) = find_conflict(&users, &user) {
            return Err(conflict);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }
        if let Some(conflict) = find_conflict(&users, &user) {
            return Err(conflict);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}
