//! Database module for eproc-scraper
//!
//! Provides SQLite operations for parties and their cases.

pub mod cases;
pub mod connection;
pub mod models;
pub mod parties;
pub mod schema;

pub use connection::{create_memory_pool, create_pool, create_pool_from_env, health_check, DbPool};
pub use models::*;
