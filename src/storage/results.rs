//! Race result queries

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::types::RaceResult;

fn result_from_row(row: &Row<'_>) -> rusqlite::Result<RaceResult> {
    Ok(RaceResult {
        id: row.get(0)?,
        runner_id: row.get(1)?,
        race_result: row.get(2)?,
        location: row.get(3)?,
        position: row.get(4)?,
        year: row.get(5)?,
    })
}

/// Insert a race result
pub fn insert_result(conn: &Connection, result: &RaceResult) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO results
        (id, runner_id, race_result, location, position, year)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            result.id,
            result.runner_id,
            result.race_result,
            result.location,
            result.position,
            result.year,
        ],
    )
    .context("Failed to insert result")?;
    Ok(())
}

/// Delete a race result, returning the deleted row if it existed
pub fn delete_result(conn: &Connection, result_id: &str) -> Result<Option<RaceResult>> {
    let deleted = conn
        .query_row(
            r#"
            DELETE FROM results WHERE id = ?1
            RETURNING id, runner_id, race_result, location, position, year
            "#,
            [result_id],
            result_from_row,
        )
        .optional()
        .context("Failed to delete result")?;
    Ok(deleted)
}

/// Get all results for a runner, most recent year first
pub fn get_results_by_runner(conn: &Connection, runner_id: &str) -> Result<Vec<RaceResult>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, runner_id, race_result, location, position, year
        FROM results
        WHERE runner_id = ?1
        ORDER BY year DESC, race_result
        "#,
    )?;

    let results = stmt
        .query_map([runner_id], result_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to get results")?;

    Ok(results)
}
