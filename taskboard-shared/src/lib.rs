//! # Taskboard Shared Library
//!
//! This crate contains the types and business logic shared by the Taskboard
//! API server and the reminder worker.
//!
//! ## Module Organization
//!
//! - `models`: database models and their queries
//! - `services`: authorized, audited operations over the models
//! - `rbac`: roles, operations, and the access policy
//! - `db`: connection pooling and migrations
//! - `export`: CSV rendering for tasks and the project report
//! - `error`: the common service error type

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod rbac;
pub mod services;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
