//! Snippetbox web application library.
//!
//! The server binary and the integration tests both build the router from
//! here, so tests exercise exactly the middleware stack that production runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;

/// Embedded database migrations for the snippets and users tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
