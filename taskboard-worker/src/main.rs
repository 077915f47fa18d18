//! # Taskboard Worker
//!
//! This is the reminder worker for Taskboard. It periodically scans for
//! live, unfinished tasks whose due date has passed and delivers one
//! reminder per task through the configured notifier.
//!
//! ## Configuration
//!
//! Read from the environment (a `.env` file is honored):
//!
//! - `DATABASE_URL` - PostgreSQL connection string (required)
//! - `REMINDER_INTERVAL_SECS` - Seconds between scans (default: 300)
//! - `REMINDER_BATCH_SIZE` - Max reminders per scan (default: 100)
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-worker
//! ```

use anyhow::Context;
use std::sync::Arc;
use taskboard_shared::db::{migrations, pool};
use taskboard_worker::notifier::LogNotifier;
use taskboard_worker::scanner::{ReminderScanner, ScannerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_worker=debug,taskboard_shared=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskboard Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let config = scanner_config_from_env()?;

    // Initialize database pool and apply pending migrations
    let db_config = pool::DatabaseConfig {
        url: database_url,
        ..Default::default()
    };
    let db = pool::create_pool(db_config).await?;
    migrations::run_migrations(&db).await?;

    // Start the scan loop
    let scanner = ReminderScanner::with_config(db.clone(), Arc::new(LogNotifier::new()), config);
    let shutdown = scanner.shutdown_token();

    let handle = tokio::spawn(async move { scanner.run().await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping scanner...");
    shutdown.cancel();

    handle.await??;
    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Builds scanner configuration from environment variables
fn scanner_config_from_env() -> anyhow::Result<ScannerConfig> {
    let mut config = ScannerConfig::default();

    if let Ok(interval) = std::env::var("REMINDER_INTERVAL_SECS") {
        config.scan_interval_secs = interval
            .parse()
            .context("REMINDER_INTERVAL_SECS must be a positive integer")?;
    }

    if let Ok(batch) = std::env::var("REMINDER_BATCH_SIZE") {
        config.batch_size = batch
            .parse()
            .context("REMINDER_BATCH_SIZE must be a positive integer")?;
    }

    Ok(config)
}
