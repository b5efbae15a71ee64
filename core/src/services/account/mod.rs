//! Account module: sign-up, sign-in and profile maintenance

mod service;


pub use service::{AccountService, AccountServiceConfig, AuthSession};
