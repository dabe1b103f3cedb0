//! SQLite module

use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

pub mod logs;

const IN_MEMORY_MARKER: &str = ":memory:";
const MAX_CONNECTIONS: u32 = 5;

/// Database connection
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    /// The database connection pool
    pub pool: SqlitePool,
}

impl SqliteDatabase {
    /// Opens the database, creating it if needed, and applies pending
    /// migrations.
    ///
    /// An in-memory database lives and dies with its only connection, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(connection_string)?.create_if_missing(true);

        let max_connections = if connection_string.contains(IN_MEMORY_MARKER) {
            1
        } else {
            MAX_CONNECTIONS
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("email log database ready");

        Ok(Self { pool })
    }

    /// Returns the underlying database connection
    pub fn connection(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Database connection details
#[derive(Debug, Parser)]
pub struct DatabaseConnectionDetails {
    /// The database connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://edgemail.db")]
    pub connection_string: String,
}
