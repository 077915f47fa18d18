//! # Taskboard Worker Library
//!
//! This library provides the reminder worker that watches for overdue
//! tasks and delivers notifications about them.
//!
//! ## Modules
//!
//! - `notifier`: Reminder delivery contract and implementations
//! - `scanner`: The periodic overdue-task scan loop
//!
//! ## Example
//!
//! ```no_run
//! use taskboard_worker::notifier::LogNotifier;
//! use taskboard_worker::scanner::ReminderScanner;
//! use std::sync::Arc;
//!
//! # async fn example(db: sqlx::PgPool) -> anyhow::Result<()> {
//! let scanner = ReminderScanner::new(db, Arc::new(LogNotifier::new()));
//! scanner.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod notifier;
pub mod scanner;
