use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::{bail, Context};
use tracing::{info, warn};

use ts_api::{app::create_app, routes::AppState, telemetry};
use ts_core::services::{
    AccountService, AccountServiceConfig, TokenCleanupConfig, TokenCleanupService, TokenService,
    TokenServiceConfig,
};
use ts_infra::database::{DatabasePool, MySqlRefreshTokenRepository, MySqlUserRepository};
use ts_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init(&config.logging);

    info!(environment = %config.environment, "Starting Turnstile API server");

    let problems = config.problems();
    if !problems.is_empty() {
        if config.environment.is_production() {
            bail!("refusing to start: {}", problems.join("; "));
        }
        for problem in &problems {
            warn!("Configuration problem: {}", problem);
        }
    }

    let pool = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to the database")?;
    pool.run_migrations()
        .await
        .context("failed to run database migrations")?;

    let token_repository = Arc::new(MySqlRefreshTokenRepository::new(pool.get_pool().clone()));
    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));

    let token_service = Arc::new(
        TokenService::new(
            Arc::clone(&token_repository),
            TokenServiceConfig::from(&config.auth.jwt),
        )
        .context("invalid token configuration")?,
    );
    let account_service = Arc::new(AccountService::new(
        user_repository,
        Arc::clone(&token_service),
        AccountServiceConfig::default(),
    ));

    Arc::new(TokenCleanupService::new(
        token_repository,
        TokenCleanupConfig::with_interval(config.auth.cleanup_interval),
    ))
    .start_background_task();

    let state = web::Data::new(AppState::new(account_service, token_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let app_pool = pool.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), Some(app_pool.clone())));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
