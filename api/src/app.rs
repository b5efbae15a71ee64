//! Application factory
//!
//! Builds the actix-web `App` with state, middleware and routes. The binary
//! and the integration tests both go through `create_app`.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpResponse,
};

use ts_core::repositories::{RefreshTokenRepository, UserRepository};
use ts_infra::database::DatabasePool;
use ts_shared::{error_codes, ErrorResponse};

use crate::middleware::JwtAuth;
use crate::routes::{
    auth::{sign_in::sign_in, sign_up::sign_up, token::rotate},
    user::{
        info::info,
        update::{update_email, update_nickname, update_password},
    },
    AppState,
};

/// Create and configure the application with all dependencies
///
/// `pool` is pinged by the health endpoint; pass `None` when the repositories
/// are not database backed.
pub fn create_app<U, R>(
    app_state: web::Data<AppState<U, R>>,
    pool: Option<DatabasePool>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let jwt_auth = JwtAuth::new(app_state.tokens.verifier());

    App::new()
        .app_data(app_state)
        .app_data(web::Data::new(pool))
        .wrap(Logger::default())
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(health_check))
                .service(
                    web::scope("/auth")
                        .route("/sign-up", web::post().to(sign_up::<U, R>))
                        .route("/sign-in", web::post().to(sign_in::<U, R>))
                        .route("/token", web::post().to(rotate::<U, R>)),
                )
                .service(
                    web::scope("/user")
                        .wrap(jwt_auth)
                        .route("/info", web::get().to(info::<U, R>))
                        .route("/email", web::patch().to(update_email::<U, R>))
                        .route("/nickname", web::patch().to(update_nickname::<U, R>))
                        .route("/password", web::patch().to(update_password::<U, R>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check(pool: web::Data<Option<DatabasePool>>) -> HttpResponse {
    let store = match pool.get_ref().as_ref() {
        Some(pool) => match pool.ping().await {
            Ok(()) => "up",
            Err(_) => "down",
        },
        None => "not_configured",
    };

    let body = serde_json::json!({
        "status": if store == "down" { "degraded" } else { "healthy" },
        "service": "turnstile",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if store == "down" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
