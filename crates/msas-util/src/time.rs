//! Time utilities for msas
//!
//! Provides wall-clock time for the daily shutdown window and a `now()`
//! wrapper that every time-sensitive decision goes through.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `MSAS_MOCK_TIME` environment variable can be set
//! to override the system time. This is useful for checking the shutdown
//! window by hand without waiting for 2 AM.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 03:30:00`)
//!
//! Example:
//! ```bash
//! MSAS_MOCK_TIME="2025-12-25 03:30:00" cargo run -p msas
//! ```

use chrono::{DateTime, Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "MSAS_MOCK_TIME";

/// Format accepted by `MSAS_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            use chrono::{NaiveDateTime, TimeZone};

            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT)
            else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    expected_format = MOCK_TIME_FORMAT,
                    "Invalid mock time format"
                );
                return None;
            };
            let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    "Failed to convert mock time to local timezone"
                );
                return None;
            };
            let offset = mock_dt.signed_duration_since(Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();
    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// `HH:MM`, used in console messages.
pub fn format_clock_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

/// `HH:MM:SS`, the stop time recorded in the history log.
pub fn format_clock_time_seconds(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// `YYYY-MM-DD HH:MM:SS`, the timestamp recorded in the history log.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Why an `HH:MM` string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected HH:MM format")]
    InvalidFormat,

    #[error("hour must be 0-23")]
    HourOutOfRange,

    #[error("minute must be 0-59")]
    MinuteOutOfRange,
}

/// Wall-clock time of day with minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallClock {
    pub hour: u8,
    pub minute: u8,
}

impl WallClock {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Strict `HH:MM` parse.
    ///
    /// Exactly two colon-separated fields made of ASCII digits only; no sign,
    /// no whitespace, no seconds field.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let mut parts = s.split(':');
        let (Some(h), Some(m), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TimeParseError::InvalidFormat);
        };

        let hour = parse_field(h)?;
        let minute = parse_field(m)?;

        if hour >= 24 {
            return Err(TimeParseError::HourOutOfRange);
        }
        if minute >= 60 {
            return Err(TimeParseError::MinuteOutOfRange);
        }

        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Truncates to the minute.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn from_datetime(dt: &DateTime<Local>) -> Self {
        Self::from_naive_time(dt.time())
    }

    /// Returns minutes since midnight (0-1439)
    pub fn as_minutes_from_midnight(&self) -> u16 {
        (self.hour as u16) * 60 + (self.minute as u16)
    }
}

fn parse_field(field: &str) -> Result<u32, TimeParseError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidFormat);
    }
    field.parse().map_err(|_| TimeParseError::InvalidFormat)
}

impl FromStr for WallClock {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl PartialOrd for WallClock {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallClock {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_minutes_from_midnight()
            .cmp(&other.as_minutes_from_midnight())
    }
}

/// A daily window, start inclusive and end exclusive.
///
/// When `start > end` the window crosses midnight. `start == end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: WallClock,
    pub end: WallClock,
}

impl TimeWindow {
    pub fn new(start: WallClock, end: WallClock) -> Self {
        Self { start, end }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Check if the given wall-clock time falls within this window
    pub fn contains_time(&self, time: WallClock) -> bool {
        if self.crosses_midnight() {
            // e.g. 22:00 - 06:00
            time >= self.start || time < self.end
        } else {
            time >= self.start && time < self.end
        }
    }

    /// Check if the given local datetime falls within this window
    pub fn contains(&self, dt: &DateTime<Local>) -> bool {
        self.contains_time(WallClock::from_datetime(dt))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ～ {}", self.start, self.end)
    }
}
