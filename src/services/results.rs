//! Race result submission and best-time maintenance.
//!
//! Every result that is created or deleted may move the owning runner's
//! personal best (fastest time ever) and season best (fastest time in the
//! current year). Both updates run in the same transaction as the result
//! write.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::{Clock, ServiceError};
use crate::race_time::RaceTime;
use crate::storage::{results, runners, Database};
use crate::types::RaceResult;

/// Service for creating and deleting race results
pub struct ResultsService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl ResultsService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Record a result and update the runner's best times.
    pub fn create_result(&self, result: RaceResult) -> Result<RaceResult, ServiceError> {
        let current_year = self.clock.current_year();
        let race_time = validate_result(&result, current_year)?;

        let result = RaceResult {
            id: Uuid::new_v4().to_string(),
            ..result
        };

        self.db.transaction(|tx| -> Result<(), ServiceError> {
            results::insert_result(tx, &result)?;

            let mut runner = runners::get_runner(tx, &result.runner_id)?
                .ok_or_else(|| ServiceError::not_found("Runner not found"))?;

            if improves(race_time, &runner.personal_best, "personal best")? {
                debug!(
                    runner_id = %runner.id,
                    time = %result.race_result,
                    seconds = race_time.as_secs(),
                    "New personal best"
                );
                runner.personal_best = result.race_result.clone();
            }

            if result.year == current_year {
                // A season best from an earlier year no longer counts
                let season_best = if runner.season_year == Some(current_year) {
                    runner.season_best.as_str()
                } else {
                    ""
                };

                if improves(race_time, season_best, "season best")? {
                    debug!(runner_id = %runner.id, time = %result.race_result, "New season best");
                    runner.season_best = result.race_result.clone();
                    runner.season_year = Some(current_year);
                }
            }

            runners::update_runner_results(tx, &runner)?;
            Ok(())
        })?;

        info!(result_id = %result.id, runner_id = %result.runner_id, "Result created");
        Ok(result)
    }

    /// Delete a result and recompute any best time it held.
    pub fn delete_result(&self, result_id: &str) -> Result<(), ServiceError> {
        if result_id.is_empty() {
            return Err(ServiceError::invalid("Invalid result ID"));
        }

        let current_year = self.clock.current_year();

        self.db.transaction(|tx| -> Result<(), ServiceError> {
            let deleted = results::delete_result(tx, result_id)?
                .ok_or_else(|| ServiceError::not_found("Result not found"))?;

            let mut runner = runners::get_runner(tx, &deleted.runner_id)?
                .ok_or_else(|| ServiceError::not_found("Runner not found"))?;

            let held_personal_best = runner.personal_best == deleted.race_result;
            let held_season_best = runner.season_best == deleted.race_result
                && deleted.year == current_year
                && runner.season_year == Some(current_year);

            if !held_personal_best && !held_season_best {
                return Ok(());
            }

            let remaining = results::get_results_by_runner(tx, &deleted.runner_id)?;

            if held_personal_best {
                runner.personal_best = fastest(&remaining)?.unwrap_or_default();
            }

            if held_season_best {
                let this_season: Vec<RaceResult> = remaining
                    .into_iter()
                    .filter(|r| r.year == current_year)
                    .collect();

                match fastest(&this_season)? {
                    Some(time) => runner.season_best = time,
                    None => {
                        runner.season_best.clear();
                        runner.season_year = None;
                    }
                }
            }

            debug!(
                runner_id = %runner.id,
                personal_best = %runner.personal_best,
                season_best = %runner.season_best,
                "Recomputed best times"
            );
            runners::update_runner_results(tx, &runner)?;
            Ok(())
        })?;

        info!(result_id, "Result deleted");
        Ok(())
    }
}

/// Check a candidate result, returning its parsed time.
fn validate_result(result: &RaceResult, current_year: i32) -> Result<RaceTime, ServiceError> {
    if result.runner_id.is_empty() {
        return Err(ServiceError::invalid("Invalid runner ID"));
    }
    if result.race_result.is_empty() {
        return Err(ServiceError::invalid("Invalid race result"));
    }
    if result.location.is_empty() {
        return Err(ServiceError::invalid("Invalid location"));
    }
    if result.position < 0 {
        return Err(ServiceError::invalid("Invalid position"));
    }
    if result.year < 0 || result.year > current_year {
        return Err(ServiceError::invalid("Invalid year"));
    }

    RaceTime::parse(&result.race_result).map_err(|_| ServiceError::invalid("Invalid race result"))
}

/// Parse a time that was already stored. Failure means corrupt data.
fn parse_stored(value: &str, what: &str) -> Result<RaceTime, ServiceError> {
    RaceTime::parse(value)
        .map_err(|e| ServiceError::Internal(format!("Failed to parse {}: {}", what, e)))
}

/// True if `candidate` should replace `best`. An empty best is always replaced.
fn improves(candidate: RaceTime, best: &str, what: &str) -> Result<bool, ServiceError> {
    if best.is_empty() {
        return Ok(true);
    }
    Ok(candidate < parse_stored(best, what)?)
}

/// Time string of the fastest result, if any.
fn fastest(results: &[RaceResult]) -> Result<Option<String>, ServiceError> {
    let mut best: Option<(RaceTime, &str)> = None;

    for result in results {
        let time = parse_stored(&result.race_result, "race result")?;
        if best.map_or(true, |(best_time, _)| time < best_time) {
            best = Some((time, &result.race_result));
        }
    }

    Ok(best.map(|(_, s)| s.to_string()))
}
