//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Email and nickname are each unique. `create` and `update` report a
/// collision as `DomainError::Conflict` naming the offending field.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use ts_core::repositories::UserRepository;
/// use ts_core::domain::entities::user::User;
/// use ts_core::errors::DomainError;
///
/// struct MySqlUserRepository {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for MySqlUserRepository {
///     async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn create(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
///
///     async fn update(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email address (stored lowercase)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by nickname
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Conflict)` - Email or nickname already taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::NotFound)` - No user with that ID
    /// * `Err(DomainError::Conflict)` - New email or nickname already taken
    async fn update(&self, user: User) -> Result<User, DomainError>;
}
