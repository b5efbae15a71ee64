//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ts_core::domain::entities::user::User;
use ts_core::errors::DomainError;
use ts_core::repositories::UserRepository;

const SELECT_USER: &str = r#"
    SELECT id, email, nickname, password_hash, created_at, updated_at
    FROM users
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    ///
    /// # Returns
    /// A new instance of MySqlUserRepository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    ///
    /// Maps database columns to User struct fields
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Failed to get id: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::storage(format!("Invalid UUID: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| DomainError::storage(format!("Failed to get email: {}", e)))?,
            nickname: row
                .try_get("nickname")
                .map_err(|e| DomainError::storage(format!("Failed to get nickname: {}", e)))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::storage(format!("Failed to get password_hash: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::storage(format!("Failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::storage(format!("Failed to get updated_at: {}", e)))?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE {} = ? LIMIT 1", SELECT_USER, column);

        let result = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find user: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}

/// Maps a unique key violation to `Conflict`, anything else to `Storage`
fn write_error(e: sqlx::Error, action: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let field = if db.message().contains("nickname") {
                "nickname"
            } else {
                "email"
            };
            return DomainError::Conflict {
                field: field.to_string(),
            };
        }
    }
    DomainError::storage(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_one("id", &id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError> {
        self.find_one("nickname", nickname).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (id, email, nickname, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.nickname)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "create user"))?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users
            SET email = ?, nickname = ?, password_hash = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.nickname)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "update user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        Ok(user)
    }
}
