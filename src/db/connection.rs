//! Database connection management

use crate::config::DEFAULT_DATABASE_URL;
use crate::db::schema::init_schema;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Type alias for the database pool
pub type DbPool = SqlitePool;

/// Create a new database connection pool and apply the schema
///
/// # Arguments
/// * `database_url` - SQLite connection string; the file is created if missing
///
/// # Example
/// ```ignore
/// let pool = create_pool("sqlite://data/eproc.db").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create a pool from DATABASE_URL environment variable
pub async fn create_pool_from_env() -> Result<DbPool> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    create_pool(&database_url).await
}

/// Create a private in-memory database.
///
/// The pool holds a single connection that never expires, since every
/// SQLite in-memory connection is its own database.
pub async fn create_memory_pool() -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Run a trivial query to confirm the store is reachable
pub async fn health_check(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
