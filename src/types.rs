//! Request and response types for the Runners API.

use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// A runner and their best times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Fastest time across all years, empty when no results exist
    #[serde(default)]
    pub personal_best: String,
    /// Fastest time in `season_year`, empty when none
    #[serde(default)]
    pub season_best: String,
    /// Year the season best was recorded in
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<RaceResult>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            country: String::new(),
            is_active: default_active(),
            personal_best: String::new(),
            season_best: String::new(),
            season_year: None,
            results: Vec::new(),
        }
    }
}

/// A single race performance owned by a runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub runner_id: String,
    /// Finish time as `HH:MM:SS`
    #[serde(default)]
    pub race_result: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub year: i32,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
