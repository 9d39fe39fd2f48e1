//! Named recurrence intervals for recurring background tasks.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A named, fixed recurrence cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    /// Every ten minutes.
    EveryTenMinutes,
    /// Once an hour.
    Hourly,
    /// Twice a day.
    TwiceDaily,
    /// Once a day.
    Daily,
}

impl Interval {
    /// Length of one period.
    pub fn as_duration(&self) -> Duration {
        match self {
            Self::EveryTenMinutes => Duration::from_secs(10 * 60),
            Self::Hourly => Duration::from_secs(60 * 60),
            Self::TwiceDaily => Duration::from_secs(12 * 60 * 60),
            Self::Daily => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Stable name of the interval.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EveryTenMinutes => "every_ten_minutes",
            Self::Hourly => "hourly",
            Self::TwiceDaily => "twice_daily",
            Self::Daily => "daily",
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EveryTenMinutes
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "every_ten_minutes" => Ok(Self::EveryTenMinutes),
            "hourly" => Ok(Self::Hourly),
            "twice_daily" => Ok(Self::TwiceDaily),
            "daily" => Ok(Self::Daily),
            other => Err(AppError::configuration(format!(
                "Unknown interval '{other}'. Supported: every_ten_minutes, hourly, twice_daily, daily"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for interval in [
            Interval::EveryTenMinutes,
            Interval::Hourly,
            Interval::TwiceDaily,
            Interval::Daily,
        ] {
            assert_eq!(interval.name().parse::<Interval>().expect("parse"), interval);
        }
    }

    #[test]
    fn test_default_is_ten_minutes() {
        assert_eq!(Interval::default().as_duration(), Duration::from_secs(600));
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let err = "weekly".parse::<Interval>().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
