//! # Taskboard API Server Library
//!
//! HTTP surface of the taskboard service: actor resolution, request
//! validation, and JSON/CSV responses over the shared service layer.
//!
//! - `app`: application state, router builder, and actor middleware
//! - `config`: environment-driven configuration
//! - `error`: `ApiError` and its HTTP response mapping
//! - `routes`: one handler module per resource

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
