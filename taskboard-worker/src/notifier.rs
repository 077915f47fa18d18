/// Notifier trait and implementations
///
/// This module defines the contract for delivering overdue-task
/// reminders. The scanner finds tasks whose due date has passed and
/// hands each one to a notifier; how the reminder reaches a human is
/// the notifier's business.
///
/// # Notifier Contract
///
/// All notifiers must:
/// 1. Implement the `Notifier` trait (async)
/// 2. Return `Ok(())` only once the reminder is durably handed off
/// 3. Return an error when delivery should be retried on the next scan
///
/// The scanner marks a task as reminded only after the notifier
/// reports success, so a failed delivery is picked up again.
///
/// # Example
///
/// ```no_run
/// use taskboard_worker::notifier::{Notifier, NotifierResult};
/// use taskboard_shared::models::task::Task;
/// use async_trait::async_trait;
///
/// struct WebhookNotifier;
///
/// #[async_trait]
/// impl Notifier for WebhookNotifier {
///     fn name(&self) -> &str {
///         "webhook"
///     }
///
///     async fn notify_overdue(&self, task: &Task) -> NotifierResult<()> {
///         // POST to an incoming-webhook URL...
///         Ok(())
///     }
/// }
/// ```

use async_trait::async_trait;
use std::sync::Mutex;
use taskboard_shared::models::task::Task;
use uuid::Uuid;

/// Notifier error types
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// Delivery failed; the scanner retries on the next pass
    #[error("Reminder delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Notifier result type alias
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Reminder delivery contract
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the notifier name
    ///
    /// Used for logging.
    fn name(&self) -> &str;

    /// Delivers a reminder for one overdue task
    ///
    /// # Errors
    ///
    /// Returns an error when delivery failed and should be retried.
    async fn notify_overdue(&self, task: &Task) -> NotifierResult<()>;
}

/// Notifier that writes reminders to the service log
///
/// The default delivery channel. Operators watch the worker's log
/// output; anything fancier (email, chat webhooks) implements
/// `Notifier` and replaces this at wiring time.
pub struct LogNotifier;

impl LogNotifier {
    /// Creates a new log notifier
    pub fn new() -> Self {
        LogNotifier
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify_overdue(&self, task: &Task) -> NotifierResult<()> {
        tracing::warn!(
            task_id = %task.id,
            project_id = %task.project_id,
            title = %task.title,
            due_date = ?task.due_date,
            assigned_to = ?task.assigned_to_user_id,
            "Task is overdue"
        );
        Ok(())
    }
}

/// Mock notifier for testing
///
/// Records the id of every task it is asked about and can be told to
/// fail, so tests can drive both scanner paths without any real
/// delivery channel.
pub struct MockNotifier {
    notified: Mutex<Vec<Uuid>>,
    fail: Mutex<bool>,
}

impl MockNotifier {
    /// Creates a new mock notifier that accepts every delivery
    pub fn new() -> Self {
        MockNotifier {
            notified: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    /// Makes subsequent deliveries fail (or succeed again)
    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Returns the task ids seen so far, in delivery order
    pub fn notified(&self) -> Vec<Uuid> {
        self.notified.lock().unwrap().clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify_overdue(&self, task: &Task) -> NotifierResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(NotifierError::DeliveryFailed(
                "mock notifier set to fail".to_string(),
            ));
        }
        self.notified.lock().unwrap().push(task.id);
        Ok(())
    }
}
