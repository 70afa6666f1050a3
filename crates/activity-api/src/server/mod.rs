//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use activity_common::{AppConfig, AppError, JwtService};
use activity_core::IdGenerator;
use activity_db::{
    create_pool, run_migrations, PgCommentRepository, PgMessageRepository, PgReportRepository,
    PgUserRepository, PoolConfig,
};
use activity_service::{BootstrapService, SeedOutcome, ServiceContextBuilder};
use axum::Router;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(&state),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_development(),
    )?;
    let health = apply_middleware(health_routes());
    let app = api.merge(health).with_state(state);

    // Routing happens inside, after `/api/v1/users/` became `/api/v1/users`
    Ok(Router::new().fallback_service(NormalizePathLayer::trim_trailing_slash().layer(app)))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let id_generator = Arc::new(
        IdGenerator::new(config.ids.worker_id).map_err(|e| AppError::Config(e.to_string()))?,
    );

    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .report_repo(Arc::new(PgReportRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .message_repo(Arc::new(PgMessageRepository::new(pool)))
        .jwt_service(jwt_service)
        .id_generator(id_generator)
        .display(config.display.clone())
        .admin_seed(config.admin.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Create the configured admin account on first start
pub async fn seed_admin(state: &AppState) -> Result<SeedOutcome, AppError> {
    let outcome = BootstrapService::new(state.service_context())
        .seed_admin()
        .await?;
    info!(outcome = ?outcome, "Admin bootstrap finished");
    Ok(outcome)
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;

    let state = create_app_state(config).await?;
    seed_admin(&state).await?;

    let app = create_app(state)?;

    run_server(app, addr).await
}
