//! Snippetbox Core - Shared types library.
//!
//! This crate provides common types used across all Snippetbox components:
//! - `web` - The server-rendered snippet site
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation logic - no I/O,
//! no database access, no HTTP. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`validator`] - Form validation helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validator;

pub use types::*;
pub use validator::Validator;
