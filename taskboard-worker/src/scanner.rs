/// Overdue-task reminder scanner
///
/// This module implements the worker's main loop. On a fixed interval
/// it asks the database for live, unfinished tasks whose due date has
/// passed and which have not been reminded since that due date, then
/// delivers one reminder per task through the configured notifier.
///
/// # Reminder Semantics
///
/// A task qualifies for a reminder when all of these hold:
/// - it is not soft-deleted
/// - its status is not `done`
/// - its due date lies in the past
/// - it has never been reminded, or its due date moved after the last
///   reminder
///
/// `reminded_at` is stamped only after the notifier accepts delivery,
/// so failed deliveries are retried on the next scan. Pushing a task's
/// due date into the future and past it again re-arms the reminder.
///
/// # Example
///
/// ```no_run
/// use taskboard_worker::notifier::LogNotifier;
/// use taskboard_worker::scanner::{ReminderScanner, ScannerConfig};
/// use std::sync::Arc;
/// # async fn example(db: sqlx::PgPool) -> anyhow::Result<()> {
/// let scanner = ReminderScanner::new(db, Arc::new(LogNotifier::new()));
/// let shutdown = scanner.shutdown_token();
///
/// tokio::spawn(async move {
///     tokio::signal::ctrl_c().await.ok();
///     shutdown.cancel();
/// });
///
/// scanner.run().await?;
/// # Ok(())
/// # }
/// ```

use crate::notifier::Notifier;
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::models::task::Task;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

/// Default seconds between scans (5 minutes)
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 300;

/// Default maximum reminders delivered per scan
pub const DEFAULT_BATCH_SIZE: i64 = 100;

/// Reminder scanner configuration
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Seconds between scans
    pub scan_interval_secs: u64,

    /// Maximum reminders delivered per scan
    pub batch_size: i64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Reminder scanner
///
/// Owns the scan loop. One instance runs per worker process; the
/// qualifying-task query is cheap and the notifier serializes
/// deliveries, so there is no claim protocol between workers.
pub struct ReminderScanner {
    /// Database connection pool
    db: PgPool,

    /// Reminder delivery channel
    notifier: Arc<dyn Notifier>,

    /// Configuration
    config: ScannerConfig,

    /// Shutdown token
    shutdown_token: CancellationToken,
}

impl ReminderScanner {
    /// Creates a new reminder scanner with default configuration
    pub fn new(db: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        ReminderScanner {
            db,
            notifier,
            config: ScannerConfig::default(),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Creates a new reminder scanner with custom configuration
    pub fn with_config(db: PgPool, notifier: Arc<dyn Notifier>, config: ScannerConfig) -> Self {
        ReminderScanner {
            db,
            notifier,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Gets the shutdown token
    ///
    /// Used to signal graceful shutdown from external handlers.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the scan loop until shutdown
    ///
    /// Scans once immediately, then on every interval tick. Scan
    /// failures are logged and the loop keeps going; only shutdown
    /// stops it.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            interval_secs = self.config.scan_interval_secs,
            batch_size = self.config.batch_size,
            notifier = self.notifier.name(),
            "Reminder scanner starting"
        );

        loop {
            if self.shutdown_token.is_cancelled() {
                break;
            }

            match self.scan_once().await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Delivered overdue reminders"),
                Err(e) => tracing::error!("Reminder scan failed: {}", e),
            }

            tokio::select! {
                _ = self.shutdown_token.cancelled() => break,
                _ = sleep(Duration::from_secs(self.config.scan_interval_secs)) => {}
            }
        }

        tracing::info!("Reminder scanner stopped");
        Ok(())
    }

    /// Performs a single scan
    ///
    /// Returns the number of reminders delivered. A task is stamped as
    /// reminded only after its delivery succeeds; failed deliveries
    /// stay eligible and are retried next scan.
    pub async fn scan_once(&self) -> anyhow::Result<usize> {
        let due = Task::due_for_reminder(&self.db, self.config.batch_size).await?;

        if due.is_empty() {
            return Ok(0);
        }

        tracing::debug!(candidates = due.len(), "Found overdue tasks needing reminders");

        let mut delivered = 0;
        for task in due {
            match self.notifier.notify_overdue(&task).await {
                Ok(()) => {
                    // Stamp only on success so failures retry
                    if Task::mark_reminded(&self.db, task.id).await? {
                        delivered += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        task_id = %task.id,
                        notifier = self.notifier.name(),
                        "Reminder delivery failed, will retry next scan: {}",
                        e
                    );
                }
            }
        }

        Ok(delivered)
    }
}
