//! Runner queries

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::types::Runner;

const RUNNER_COLUMNS: &str =
    "id, name, country, is_active, personal_best, season_best, season_year";

fn runner_from_row(row: &Row<'_>) -> rusqlite::Result<Runner> {
    Ok(Runner {
        id: row.get(0)?,
        name: row.get(1)?,
        country: row.get(2)?,
        is_active: row.get(3)?,
        personal_best: row.get(4)?,
        season_best: row.get(5)?,
        season_year: row.get(6)?,
        results: Vec::new(),
    })
}

/// Insert a new runner
pub fn insert_runner(conn: &Connection, runner: &Runner) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO runners
        (id, name, country, is_active, personal_best, season_best, season_year)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            runner.id,
            runner.name,
            runner.country,
            runner.is_active,
            runner.personal_best,
            runner.season_best,
            runner.season_year,
        ],
    )
    .context("Failed to insert runner")?;
    Ok(())
}

/// Update profile fields. Returns false if no runner has this id.
pub fn update_runner(conn: &Connection, runner: &Runner) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE runners SET name = ?2, country = ?3 WHERE id = ?1",
            params![runner.id, runner.name, runner.country],
        )
        .context("Failed to update runner")?;
    Ok(changed > 0)
}

/// Persist the best-time fields of a runner
pub fn update_runner_results(conn: &Connection, runner: &Runner) -> Result<()> {
    conn.execute(
        r#"
        UPDATE runners
        SET personal_best = ?2, season_best = ?3, season_year = ?4
        WHERE id = ?1
        "#,
        params![
            runner.id,
            runner.personal_best,
            runner.season_best,
            runner.season_year,
        ],
    )
    .context("Failed to update runner best times")?;
    Ok(())
}

/// Mark a runner inactive. Returns false if no runner has this id.
pub fn deactivate_runner(conn: &Connection, runner_id: &str) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE runners SET is_active = 0 WHERE id = ?1",
            [runner_id],
        )
        .context("Failed to deactivate runner")?;
    Ok(changed > 0)
}

/// Get a runner by id
pub fn get_runner(conn: &Connection, runner_id: &str) -> Result<Option<Runner>> {
    let sql = format!("SELECT {} FROM runners WHERE id = ?1", RUNNER_COLUMNS);
    let runner = conn
        .query_row(&sql, [runner_id], runner_from_row)
        .optional()
        .context("Failed to get runner")?;
    Ok(runner)
}

/// Get all runners
pub fn get_runners(conn: &Connection) -> Result<Vec<Runner>> {
    let sql = format!("SELECT {} FROM runners ORDER BY created_at, id", RUNNER_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;

    let runners = stmt
        .query_map([], runner_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to list runners")?;

    Ok(runners)
}
