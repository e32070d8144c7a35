//! Business logic for runners and race results.

pub mod results;
pub mod runners;

use chrono::Datelike;
use thiserror::Error;

pub use results::ResultsService;
pub use runners::RunnersService;

/// Errors returned by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed client input
    #[error("{0}")]
    InvalidInput(String),
    /// Referenced runner or result does not exist
    #[error("{0}")]
    NotFound(String),
    /// Stored data is inconsistent
    #[error("{0}")]
    Internal(String),
    /// Database failure
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Source of the current season year.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Clock backed by the local system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// Clock pinned to a fixed year.
#[cfg(test)]
pub struct FixedClock(pub i32);

#[cfg(test)]
impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
