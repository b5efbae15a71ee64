use actix_web::{web, HttpResponse};
use validator::Validate;

use ts_core::domain::entities::user::User;
use ts_core::errors::DomainError;
use ts_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::user_dto::{
    UpdateEmailRequest, UpdateNicknameRequest, UpdatePasswordRequest, UserResponse,
};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::middleware::AuthContext;
use crate::routes::AppState;

/// Handler for PATCH /api/v1/user/email
///
/// ## Errors
/// - 400 Bad Request: Not an email address
/// - 409 Conflict: Address belongs to another account
pub async fn update_email<U, R>(
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
    request: web::Json<UpdateEmailRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    respond(state.accounts.update_email(&auth.subject_id, &request.email).await)
}

/// Handler for PATCH /api/v1/user/nickname
pub async fn update_nickname<U, R>(
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
    request: web::Json<UpdateNicknameRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    respond(state.accounts.update_nickname(&auth.subject_id, &request.nickname).await)
}

/// Handler for PATCH /api/v1/user/password
///
/// Tokens issued before the change stay valid.
pub async fn update_password<U, R>(
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
    request: web::Json<UpdatePasswordRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    respond(state.accounts.update_password(&auth.subject_id, &request.password).await)
}

fn respond(result: Result<User, DomainError>) -> HttpResponse {
    match result {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(error) => handle_domain_error(error),
    }
}
