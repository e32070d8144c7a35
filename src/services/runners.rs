//! Runner CRUD.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::storage::{results, runners, Database};
use crate::types::Runner;

/// Service for managing runner records
pub struct RunnersService {
    db: Arc<Database>,
}

impl RunnersService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a runner. Ids and best times are assigned by the server.
    pub fn create_runner(&self, runner: Runner) -> Result<Runner, ServiceError> {
        if runner.name.is_empty() {
            return Err(ServiceError::invalid("Invalid name"));
        }
        if !runner.id.is_empty() {
            return Err(ServiceError::invalid("Runner ID must not be set"));
        }
        if !runner.personal_best.is_empty() || !runner.season_best.is_empty() {
            return Err(ServiceError::invalid("Best times must not be set"));
        }

        let runner = Runner {
            id: Uuid::new_v4().to_string(),
            is_active: true,
            season_year: None,
            results: Vec::new(),
            ..runner
        };

        self.db
            .transaction(|tx| runners::insert_runner(tx, &runner))?;

        info!(runner_id = %runner.id, "Runner created");
        Ok(runner)
    }

    /// Update a runner's name and country.
    pub fn update_runner(&self, runner: Runner) -> Result<(), ServiceError> {
        if runner.id.is_empty() {
            return Err(ServiceError::invalid("Invalid runner ID"));
        }
        if runner.name.is_empty() {
            return Err(ServiceError::invalid("Invalid name"));
        }

        let updated = self
            .db
            .transaction(|tx| runners::update_runner(tx, &runner))?;
        if !updated {
            return Err(ServiceError::not_found("Runner not found"));
        }
        Ok(())
    }

    /// Mark a runner inactive.
    pub fn delete_runner(&self, runner_id: &str) -> Result<(), ServiceError> {
        if runner_id.is_empty() {
            return Err(ServiceError::invalid("Invalid runner ID"));
        }

        let deactivated = self
            .db
            .transaction(|tx| runners::deactivate_runner(tx, runner_id))?;
        if !deactivated {
            return Err(ServiceError::not_found("Runner not found"));
        }

        info!(runner_id, "Runner deactivated");
        Ok(())
    }

    /// Get a runner together with their results.
    pub fn get_runner(&self, runner_id: &str) -> Result<Runner, ServiceError> {
        if runner_id.is_empty() {
            return Err(ServiceError::invalid("Invalid runner ID"));
        }

        self.db.transaction(|tx| -> Result<Runner, ServiceError> {
            let mut runner = runners::get_runner(tx, runner_id)?
                .ok_or_else(|| ServiceError::not_found("Runner not found"))?;
            runner.results = results::get_results_by_runner(tx, runner_id)?;
            Ok(runner)
        })
    }

    /// List all runners.
    pub fn get_runners(&self) -> Result<Vec<Runner>, ServiceError> {
        Ok(self.db.transaction(|tx| runners::get_runners(tx))?)
    }
}
