//! Race time parsing.
//!
//! Race results are recorded as fixed-width `HH:MM:SS` strings. They are
//! parsed into a [`RaceTime`] so that best times are compared numerically.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Length of a `HH:MM:SS` string
const RACE_TIME_LEN: usize = 8;

/// Error returned when a race time string is not in `HH:MM:SS` layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid race time '{input}': expected HH:MM:SS")]
pub struct ParseRaceTimeError {
    input: String,
}

/// A race duration in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RaceTime(u32);

impl RaceTime {
    /// Parse a `HH:MM:SS` string.
    ///
    /// Minutes and seconds are not range-checked, so `00:99:99` is accepted
    /// as 99 minutes and 99 seconds.
    pub fn parse(s: &str) -> Result<Self, ParseRaceTimeError> {
        let err = || ParseRaceTimeError {
            input: s.to_string(),
        };

        let bytes = s.as_bytes();
        if bytes.len() != RACE_TIME_LEN || bytes[2] != b':' || bytes[5] != b':' {
            return Err(err());
        }

        let field = |start: usize| -> Result<u32, ParseRaceTimeError> {
            let (tens, ones) = (bytes[start], bytes[start + 1]);
            if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
                return Err(err());
            }
            Ok(u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
        };

        let hours = field(0)?;
        let minutes = field(3)?;
        let seconds = field(6)?;

        Ok(Self(hours * 3600 + minutes * 60 + seconds))
    }

    /// Total number of seconds
    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl FromStr for RaceTime {
    type Err = ParseRaceTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}
