//! SQLite schema definitions
//!
//! Tables:
//! - runners: Runner profile and best times
//! - results: Race results, one row per performance

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS runners (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            country TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 1,
            personal_best TEXT NOT NULL DEFAULT '',
            season_best TEXT NOT NULL DEFAULT '',
            season_year INTEGER,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    // No foreign key on runner_id: a missing runner is reported by the
    // service as not found, after which the insert is rolled back.
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS results (
            id TEXT PRIMARY KEY,
            runner_id TEXT NOT NULL,
            race_result TEXT NOT NULL,
            location TEXT NOT NULL,
            position INTEGER NOT NULL,
            year INTEGER NOT NULL,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_results_runner ON results(runner_id)",
        [],
    )?;

    Ok(())
}
