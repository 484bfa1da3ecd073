//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::application::{SeedAdminUseCase, spawn_session_reaper};
use auth::{MemoryAuthRepository, auth_router, with_session};
use axum::{
    Router, http,
    http::{Method, header},
};
use catalog::{MemoryCatalogRepository, catalog_router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ServerConfig {
        bind_addr,
        frontend_origins,
        auth: auth_config,
        admin,
    } = ServerConfig::from_env()?;
    let auth_config = Arc::new(auth_config);

    let users = Arc::new(MemoryAuthRepository::new());
    let catalog = Arc::new(MemoryCatalogRepository::new());

    // Seed the administrator account; the use case logs the outcome
    SeedAdminUseCase::new(users.clone(), auth_config.clone())
        .execute(admin)
        .await
        .map_err(|e| anyhow::anyhow!("Admin seeding failed: {e}"))?;

    let _reaper = spawn_session_reaper(users.clone(), auth_config.session_reap_interval);

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let api = Router::new().nest(
        "/api",
        auth_router(users.clone(), auth_config.clone())
            .merge(catalog_router(users.clone(), catalog)),
    );

    let app = with_session(api, users, auth_config)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
