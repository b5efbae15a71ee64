//! Account service: registration, sign-in and profile changes

use std::sync::Arc;
use tracing::{debug, info};
use ts_shared::validation::{
    is_valid_email, is_valid_nickname, is_valid_password, NICKNAME_MAX_LENGTH,
    NICKNAME_MIN_LENGTH, PASSWORD_MIN_LENGTH,
};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::domain::value_objects::{LoginIdentifier, SubjectId};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{RefreshTokenRepository, UserRepository};
use crate::services::token::TokenService;

/// Configuration for the account service
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 12,
        }
    }
}

/// A user together with a freshly issued token pair
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// Account management built on top of the token service
pub struct AccountService<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Token service for issuing session tokens
    token_service: Arc<TokenService<R>>,
    /// Service configuration
    config: AccountServiceConfig,
}

impl<U, R> AccountService<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    /// Create a new account service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_service` - Service issuing token pairs
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<R>>,
        config: AccountServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            config,
        }
    }

    /// Register a new account and issue its first token pair
    ///
    /// # Arguments
    ///
    /// * `email` - Email address; stored lowercase
    /// * `nickname` - Latin letters only
    /// * `password` - Plain password, hashed with bcrypt
    ///
    /// # Returns
    ///
    /// * `Ok(AuthSession)` - The created user and its tokens
    /// * `Err(DomainError::Validation)` - Malformed input
    /// * `Err(DomainError::Conflict)` - Email or nickname already taken
    pub async fn sign_up(
        &self,
        email: &str,
        nickname: &str,
        password: &str,
    ) -> Result<AuthSession, DomainError> {
        let email = normalize_email(email)?;
        let nickname = check_nickname(nickname)?;
        check_password(password)?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(conflict("email"));
        }
        if self.user_repository.find_by_nickname(&nickname).await?.is_some() {
            return Err(conflict("nickname"));
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .user_repository
            .create(User::new(email, nickname, password_hash))
            .await?;

        let tokens = self.token_service.issue(&user.subject_id()).await?;
        info!(user_id = %user.id, "User signed up");

        Ok(AuthSession { user, tokens })
    }

    /// Authenticate by email or nickname and password
    ///
    /// Unknown logins and wrong passwords yield the same
    /// `AuthError::InvalidCredentials`.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthSession)` - Credentials accepted, tokens issued
    /// * `Err(DomainError::Auth(InvalidCredentials))` - Rejected
    pub async fn sign_in(&self, login: &str, password: &str) -> Result<AuthSession, DomainError> {
        let identifier = LoginIdentifier::parse(login).ok_or(AuthError::InvalidCredentials)?;

        let user = match &identifier {
            LoginIdentifier::Email(email) => self.user_repository.find_by_email(email).await?,
            LoginIdentifier::Nickname(nickname) => {
                self.user_repository.find_by_nickname(nickname).await?
            }
        };
        let user = match user {
            Some(user) => user,
            None => {
                debug!("Sign-in for unknown login");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.verify_password(password, &user.password_hash).await? {
            info!(user_id = %user.id, "Sign-in with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = self.token_service.issue(&user.subject_id()).await?;
        info!(user_id = %user.id, "User signed in");

        Ok(AuthSession { user, tokens })
    }

    /// Profile of the authorized subject
    pub async fn profile(&self, subject: &SubjectId) -> Result<User, DomainError> {
        self.load(subject).await
    }

    /// Change the email address of the authorized subject
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::Conflict)` - Address belongs to another account
    pub async fn update_email(&self, subject: &SubjectId, email: &str) -> Result<User, DomainError> {
        let email = normalize_email(email)?;
        let mut user = self.load(subject).await?;

        if user.email == email {
            return Ok(user);
        }
        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(conflict("email"));
        }

        user.set_email(email);
        let user = self.user_repository.update(user).await?;
        info!(user_id = %user.id, "Email updated");
        Ok(user)
    }

    /// Change the nickname of the authorized subject
    pub async fn update_nickname(
        &self,
        subject: &SubjectId,
        nickname: &str,
    ) -> Result<User, DomainError> {
        let nickname = check_nickname(nickname)?;
        let mut user = self.load(subject).await?;

        if user.nickname == nickname {
            return Ok(user);
        }
        if self.user_repository.find_by_nickname(&nickname).await?.is_some() {
            return Err(conflict("nickname"));
        }

        user.set_nickname(nickname);
        let user = self.user_repository.update(user).await?;
        info!(user_id = %user.id, "Nickname updated");
        Ok(user)
    }

    /// Replace the password of the authorized subject
    ///
    /// Issued tokens stay valid.
    pub async fn update_password(
        &self,
        subject: &SubjectId,
        password: &str,
    ) -> Result<User, DomainError> {
        check_password(password)?;
        let mut user = self.load(subject).await?;

        let password_hash = self.hash_password(password).await?;
        user.set_password_hash(password_hash);

        let user = self.user_repository.update(user).await?;
        info!(user_id = %user.id, "Password updated");
        Ok(user)
    }

    async fn load(&self, subject: &SubjectId) -> Result<User, DomainError> {
        let not_found = || DomainError::NotFound {
            resource: "User".to_string(),
        };

        let id = Uuid::parse_str(subject.as_str()).map_err(|_| not_found())?;
        self.user_repository.find_by_id(id).await?.ok_or_else(not_found)
    }

    async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_string();
        let cost = self.config.bcrypt_cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| internal(format!("Password hashing failed: {}", e)))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| internal(format!("Password check task failed: {}", e)))?
            .map_err(|e| internal(format!("Password check failed: {}", e)))
    }
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(validation("Invalid email address"));
    }
    Ok(email)
}

fn check_nickname(nickname: &str) -> Result<String, DomainError> {
    let nickname = nickname.trim();
    if !is_valid_nickname(nickname) {
        return Err(validation(&format!(
            "Nickname must be {}-{} latin letters",
            NICKNAME_MIN_LENGTH, NICKNAME_MAX_LENGTH
        )));
    }
    Ok(nickname.to_string())
}

fn check_password(password: &str) -> Result<(), DomainError> {
    if !is_valid_password(password) {
        return Err(validation(&format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LENGTH
        )));
    }
    Ok(())
}

fn validation(message: &str) -> DomainError {
    DomainError::Validation {
        message: message.to_string(),
    }
}

fn conflict(field: &str) -> DomainError {
    DomainError::Conflict {
        field: field.to_string(),
    }
}

fn internal(message: String) -> DomainError {
    DomainError::Internal { message }
}
