use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

use engagement_service::config::Config;
use engagement_service::services::{EngagementService, SubscriptionService, VideoService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("🔧 Starting engagement-service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "✅ Configuration loaded: env={}, http_port={}",
        config.app.env, config.app.http_port
    );

    // Initialize database pool
    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    // Verify database connection
    sqlx::query("SELECT 1")
        .execute(&pg_pool)
        .await
        .context("Failed to verify database connection")?;
    info!("✅ Database pool created and verified");

    // Run database migrations
    sqlx::migrate!("./migrations")
        .run(&pg_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("✅ Database migrations completed");

    // Core services; the HTTP API surface that consumes them lives in
    // the gateway, this binary only exposes health endpoints.
    let subscriptions = SubscriptionService::new(pg_pool.clone());
    let engagement = EngagementService::new(pg_pool.clone());
    let videos = VideoService::new(pg_pool.clone());
    info!("✅ Services initialized");

    let http_addr = format!("{}:{}", config.app.host, config.app.http_port);
    info!("🚀 HTTP health checks: http://{}", http_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(subscriptions.clone()))
            .app_data(web::Data::new(engagement.clone()))
            .app_data(web::Data::new(videos.clone()))
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/ready", web::get().to(|| async { "READY" }))
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("🛑 engagement-service shutting down");
    Ok(())
}
