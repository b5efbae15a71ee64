//! Request and response bodies

pub mod auth_dto;
pub mod user_dto;

pub use auth_dto::{RefreshTokenRequest, SignInRequest, SignUpRequest, TokenResponse};
pub use user_dto::{UpdateEmailRequest, UpdateNicknameRequest, UpdatePasswordRequest, UserResponse};
