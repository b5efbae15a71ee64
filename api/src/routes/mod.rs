//! Route handlers grouped by resource

pub mod auth;
pub mod user;

use std::sync::Arc;

use ts_core::repositories::{RefreshTokenRepository, UserRepository};
use ts_core::services::{AccountService, TokenService};

/// Application state shared across handlers
pub struct AppState<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub accounts: Arc<AccountService<U, R>>,
    pub tokens: Arc<TokenService<R>>,
}

impl<U, R> AppState<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(accounts: Arc<AccountService<U, R>>, tokens: Arc<TokenService<R>>) -> Self {
        Self { accounts, tokens }
    }
}
