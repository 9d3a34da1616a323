//! Storage engine access.
//!
//! This module owns the only handle onto the storage engine:
//! - [`ConnectionManager`] turns a [`DatabaseConfig`](crate::config::DatabaseConfig)
//!   into a pooled connection and hands out sessions
//! - [`Session`] scopes one unit of work
//! - [`schema`] creates the tables from the entity definitions

pub mod db;
pub mod schema;

pub use db::{ConnectionManager, Session};
