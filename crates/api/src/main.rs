use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use engagement_signals_api::{app, config, jobs, middleware};

use domain::engine::SignalEngine;
use domain::sources::{EventSource, GoalStore};
use persistence::repositories::{EventRepository, GoalRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics();

    info!(
        "Starting Engagement Signals API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    // Wire collaborators into the signal engine
    let events: Arc<dyn EventSource> = Arc::new(EventRepository::new(pool.clone()));
    let goals: Arc<dyn GoalStore> = Arc::new(GoalRepository::new(pool.clone()));
    let engine = Arc::new(SignalEngine::new(
        Arc::clone(&events),
        Arc::clone(&goals),
        config.signals.thresholds(),
    ));

    // Start background jobs
    let mut scheduler = jobs::JobScheduler::new();
    if config.jobs.sweep_enabled {
        scheduler.register(jobs::SignalSweepJob::new(
            Arc::clone(&engine),
            Arc::clone(&events),
            &config.jobs,
        ));
    }
    scheduler.start();

    // Build application
    let app = app::create_app(config.clone(), pool, engine, goals);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background jobs once the server has drained
    scheduler.shutdown();
    scheduler
        .wait_for_shutdown(std::time::Duration::from_secs(10))
        .await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
