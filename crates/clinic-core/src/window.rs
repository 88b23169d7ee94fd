//! # Date Window
//!
//! The reporting range the dashboard filters transactions and expenses by.
//!
//! ## Presets
//! ```text
//!   Today        [00:00 today ............................ 23:59:59.999 today]
//!   ThisWeek     [00:00 Monday ........................... 23:59:59.999 today]
//!   Last30Days   [00:00 (today - 30d) .................... 23:59:59.999 today]
//! ```
//!
//! Day boundaries are taken in the clinic's fixed UTC offset, then stored as
//! UTC instants so they compare directly with persisted timestamps.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Preset
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WindowPreset {
    Today,
    ThisWeek,
    Last30Days,
}

impl fmt::Display for WindowPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPreset::Today => write!(f, "today"),
            WindowPreset::ThisWeek => write!(f, "this-week"),
            WindowPreset::Last30Days => write!(f, "last-30-days"),
        }
    }
}

impl FromStr for WindowPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "today" => Ok(WindowPreset::Today),
            "this-week" | "week" => Ok(WindowPreset::ThisWeek),
            "last-30-days" | "30d" => Ok(WindowPreset::Last30Days),
            other => Err(ValidationError::invalid(
                "preset",
                format!("unknown preset '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Day Boundaries
// =============================================================================

/// Builds a fixed offset from whole hours. `None` outside ±14h.
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    if !(-14..=14).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}

/// First instant of `date` in the given offset.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::MIN);
    let utc = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::<Utc>::from_naive_utc_and_offset(utc, Utc)
}

/// Last millisecond of `date` in the given offset.
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    start_of_day(date, offset) + Duration::days(1) - Duration::milliseconds(1)
}

/// Calendar date of an instant in the given offset.
pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

// =============================================================================
// Date Window
// =============================================================================

/// An inclusive `[start, end]` reporting range.
///
/// ## Invariant
/// `start <= end` always holds. Setting one bound past the other drags the
/// other bound along to the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: FixedOffset,
}

impl DateWindow {
    /// Builds a preset window relative to `now`.
    pub fn preset(preset: WindowPreset, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = local_date(now, offset);
        let first_day = match preset {
            WindowPreset::Today => today,
            WindowPreset::ThisWeek => {
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
            }
            WindowPreset::Last30Days => today - Duration::days(30),
        };

        DateWindow {
            start: start_of_day(first_day, offset),
            end: end_of_day(today, offset),
            offset,
        }
    }

    /// Custom window covering `from..=to` as whole days. Reversed input is
    /// clamped to the single day `from`.
    pub fn custom(from: NaiveDate, to: NaiveDate, offset: FixedOffset) -> Self {
        let mut window = DateWindow {
            start: start_of_day(from, offset),
            end: end_of_day(from, offset),
            offset,
        };
        window.set_end(to);
        window
    }

    /// Moves the start to the beginning of `date`.
    pub fn set_start(&mut self, date: NaiveDate) {
        self.start = start_of_day(date, self.offset);
        if self.start > self.end {
            self.end = end_of_day(date, self.offset);
        }
    }

    /// Moves the end to the last instant of `date`.
    pub fn set_end(&mut self, date: NaiveDate) {
        self.end = end_of_day(date, self.offset);
        if self.end < self.start {
            self.start = start_of_day(date, self.offset);
        }
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[inline]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.with_timezone(&self.offset).format("%Y-%m-%d %H:%M"),
            self.end.with_timezone(&self.offset).format("%Y-%m-%d %H:%M")
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
