// src/resources/wall_clock.rs

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{Result, VoidjobError};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Wall-clock limit of a job, always strictly positive.
///
/// Parses the scheduler's time formats:
///
/// - `minutes`
/// - `minutes:seconds`
/// - `hours:minutes:seconds`
/// - `days-hours`
/// - `days-hours:minutes`
/// - `days-hours:minutes:seconds`
///
/// and renders as `HH:MM:SS`, or `D-HH:MM:SS` once it spans a day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WallClock(Duration);

impl WallClock {
    pub fn from_secs(secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(VoidjobError::ResourceError(
                "wall-clock limit must be greater than zero".to_string(),
            ));
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

fn field(s: &str, input: &str) -> Result<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VoidjobError::ResourceError(format!(
            "cannot parse wall-clock limit '{input}': '{s}' is not a number"
        )));
    }
    s.parse().map_err(|e| {
        VoidjobError::ResourceError(format!("wall-clock limit '{input}' is out of range: {e}"))
    })
}

fn total(parts: &[(u64, u64)], input: &str) -> Result<u64> {
    parts.iter().try_fold(0u64, |acc, (value, scale)| {
        value
            .checked_mul(*scale)
            .and_then(|v| acc.checked_add(v))
            .ok_or_else(|| {
                VoidjobError::ResourceError(format!("wall-clock limit '{input}' overflows"))
            })
    })
}

impl FromStr for WallClock {
    type Err = VoidjobError;

    fn from_str(input: &str) -> Result<Self> {
        let s = input.trim();

        let secs = match s.split_once('-') {
            Some((days, rest)) => {
                let days = field(days, input)?;
                let clock: Vec<&str> = rest.split(':').collect();
                match clock.as_slice() {
                    [h] => total(&[(days, DAY), (field(h, input)?, HOUR)], input)?,
                    [h, m] => total(
                        &[(days, DAY), (field(h, input)?, HOUR), (field(m, input)?, MINUTE)],
                        input,
                    )?,
                    [h, m, sec] => total(
                        &[
                            (days, DAY),
                            (field(h, input)?, HOUR),
                            (field(m, input)?, MINUTE),
                            (field(sec, input)?, 1),
                        ],
                        input,
                    )?,
                    _ => {
                        return Err(VoidjobError::ResourceError(format!(
                            "cannot parse wall-clock limit '{input}'"
                        )));
                    }
                }
            }
            None => {
                let clock: Vec<&str> = s.split(':').collect();
                match clock.as_slice() {
                    [m] => total(&[(field(m, input)?, MINUTE)], input)?,
                    [m, sec] => total(&[(field(m, input)?, MINUTE), (field(sec, input)?, 1)], input)?,
                    [h, m, sec] => total(
                        &[
                            (field(h, input)?, HOUR),
                            (field(m, input)?, MINUTE),
                            (field(sec, input)?, 1),
                        ],
                        input,
                    )?,
                    _ => {
                        return Err(VoidjobError::ResourceError(format!(
                            "cannot parse wall-clock limit '{input}'"
                        )));
                    }
                }
            }
        };

        WallClock::from_secs(secs)
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let days = secs / DAY;
        let hours = (secs % DAY) / HOUR;
        let minutes = (secs % HOUR) / MINUTE;
        let seconds = secs % MINUTE;

        if days > 0 {
            write!(f, "{days}-{hours:02}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
        }
    }
}
