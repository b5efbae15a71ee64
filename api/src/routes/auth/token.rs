use actix_web::{web, HttpResponse};

use ts_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::auth_dto::{RefreshTokenRequest, TokenResponse};
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/token
///
/// Exchanges a refresh token for a new pair. The presented token is consumed.
/// A missing body or token is treated like an invalid token.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid, expired, wrong kind, or already used
/// - 500 Internal Server Error: Store unavailable
pub async fn rotate<U, R>(
    state: web::Data<AppState<U, R>>,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let raw_token = request
        .and_then(|body| body.into_inner().refresh_token)
        .unwrap_or_default();

    match state.tokens.rotate(&raw_token).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
