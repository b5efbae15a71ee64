use actix_web::{web, HttpResponse};
use validator::Validate;

use ts_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::auth_dto::{SignUpRequest, TokenResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/sign-up
///
/// Creates an account and returns its first token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "frodo@shire.org",
///     "nickname": "Baggins",
///     "password": "precious1"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "access_expires_in": 900,
///     "refresh_expires_in": 604800,
///     "user_id": "0b4c..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid email, nickname or password
/// - 409 Conflict: Email or nickname already registered
/// - 500 Internal Server Error: Store unavailable or signing failure
pub async fn sign_up<U, R>(
    state: web::Data<AppState<U, R>>,
    request: web::Json<SignUpRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .accounts
        .sign_up(&request.email, &request.nickname, &request.password)
        .await
    {
        Ok(session) => HttpResponse::Created().json(TokenResponse::from(session.tokens)),
        Err(error) => handle_domain_error(error),
    }
}
