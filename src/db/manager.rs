//! Database manager implementation
//!
//! This module provides database connection management with:
//! - SQLite connection pool using r2d2
//! - Async wrapper for blocking database operations
//! - Schema migrations on startup

use crate::core::error::{AdminError, ErrorContext, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task;

/// Database manager with connection pool
pub struct DatabaseManager {
    pool: Pool<SqliteConnectionManager>,
    db_path: PathBuf,
}

impl DatabaseManager {
    /// Open (or create) the database file and run pending migrations
    pub fn new(db_path: &Path, pool_size: u32, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create database directory {}", parent.display()))?;
        }

        let manager = SqliteConnectionManager::file(db_path)
            .with_init(move |conn| {
                conn.busy_timeout(busy_timeout)?;
                // WAL lets readers proceed while a write is in progress
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(Duration::from_secs(30))
            .build(manager)
            .context("Failed to build database connection pool")?;

        let manager = Self {
            pool,
            db_path: db_path.to_path_buf(),
        };

        manager.migrate()?;

        Ok(manager)
    }

    /// Create a new DatabaseManager with an in-memory database for testing
    pub fn new_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();

        // Every pooled connection to ":memory:" would be a separate database
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(30))
            .build(manager)
            .context("Failed to build in-memory connection pool")?;

        let manager = Self {
            pool,
            db_path: PathBuf::from(":memory:"),
        };

        manager.migrate()?;

        Ok(manager)
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AdminError::TaskError(format!("Failed to get database connection: {}", e)))
    }

    /// Execute a database operation asynchronously
    ///
    /// This wraps synchronous database operations in tokio::task::spawn_blocking
    /// to avoid blocking the async runtime.
    pub async fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(|e| {
                AdminError::TaskError(format!("Failed to get database connection: {}", e))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| AdminError::TaskError(format!("Database task panicked: {}", e)))?
    }

    /// Execute database migrations
    pub fn migrate(&self) -> Result<()> {
        let mut conn = self.get_connection()?;
        crate::db::migrations::run_migrations(&mut conn)
    }
}
