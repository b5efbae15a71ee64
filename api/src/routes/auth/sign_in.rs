use actix_web::{web, HttpResponse};
use validator::Validate;

use ts_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::auth_dto::{SignInRequest, TokenResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/sign-in
///
/// `login` is either the email address or the nickname. Unknown accounts and
/// wrong passwords get the same 401 response.
pub async fn sign_in<U, R>(
    state: web::Data<AppState<U, R>>,
    request: web::Json<SignInRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state.accounts.sign_in(&request.login, &request.password).await {
        Ok(session) => HttpResponse::Ok().json(TokenResponse::from(session.tokens)),
        Err(error) => handle_domain_error(error),
    }
}
