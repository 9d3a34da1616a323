//! Utility modules for the store.
//!
//! # Available Utilities
//!
//! - [`datetime`] - Timestamp and date parsing and formatting

pub mod datetime;
