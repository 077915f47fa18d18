/// Database layer
///
/// Connection pooling and migration management for the PostgreSQL store
/// backing users, projects, tasks, comments, and the audit log. Models live
/// in the `models` module at the crate root; all SQL stays there or in the
/// embedded `migrations/` scripts.

pub mod migrations;
pub mod pool;
