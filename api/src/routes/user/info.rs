use actix_web::{web, HttpResponse};

use ts_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::user_dto::UserResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

/// Handler for GET /api/v1/user/info
pub async fn info<U, R>(state: web::Data<AppState<U, R>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    match state.accounts.profile(&auth.subject_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(error) => handle_domain_error(error),
    }
}
