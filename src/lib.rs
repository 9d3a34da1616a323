//! Heptapal Store - persistence core for reminders and todo items
//!
//! This library stores and queries time-based reminders and actionable todo
//! items on behalf of an agent tool layer. Every operation answers with a
//! uniform success/error [`Envelope`] that the tool layer parses directly.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`config`] - Configuration loading and validation
//! * [`storage`] - Connection pool, sessions and schema creation
//! * [`entities`] - SeaORM entities for reminders and todo items
//! * [`repositories`] - Per-entity operations bound to one session
//! * [`tools`] - String-in, envelope-out facade for the calling layer
//! * [`utils`] - Date and timestamp helpers

/// Configuration module for managing store settings
pub mod config;

/// Envelope wording, formats and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Uniform result envelope returned by every operation
pub mod envelope;

/// Error taxonomy for store operations
pub mod error;

/// Logging setup on top of the `log` facade
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Connection management and schema creation
pub mod storage;

/// Facade used by the agent tool layer
pub mod tools;

/// Utility functions for date/time handling
pub mod utils;

pub use entities::{reminder, todo, Priority, Status};
pub use envelope::{Envelope, Payload};
pub use error::{StoreError, StoreResult};
pub use storage::{ConnectionManager, Session};
pub use tools::{ReminderTools, TodoTools};
