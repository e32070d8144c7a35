//! SQLite storage module for runners and race results
//!
//! [`Database`] owns the connection and the transaction boundary. The
//! [`runners`] and [`results`] modules hold the queries, taking a plain
//! `&Connection` so they run unchanged inside a transaction.

pub mod results;
pub mod runners;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::Mutex;

pub use schema::create_tables;

/// Shared SQLite handle
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `db_path`, initializing it if needed
    pub fn open(db_path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;
        create_tables(&conn).context("Failed to create tables")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` inside a transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back
    /// otherwise. The connection lock is held for the whole call, so a
    /// read-modify-write inside `f` is not interleaved with other writers.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<anyhow::Error>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock database: {}", e))?;

        let tx = conn.transaction().context("Failed to begin transaction")?;
        let value = f(&tx)?;
        tx.commit().context("Failed to commit transaction")?;

        Ok(value)
    }
}
