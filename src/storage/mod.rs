//! Storage Layer
//!
//! Persistence for engine settings (JSON config) and user preferences
//! (SQLite or in-memory).

pub mod config;
pub mod database;
pub mod preferences;

pub use config::*;
pub use database::*;
pub use preferences::*;
