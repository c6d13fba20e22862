//! Period value object and the date-only rule.
//!
//! Only sessions carry a time of day. Courses, phases and sections hold
//! bare dates, and [`validate_date_only`] enforces that at the boundary.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::slot::Slot;

/// One side of a period.
///
/// Values read off the wire stay as `Text` so the date-only check sees
/// exactly what the caller sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodValue {
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl PeriodValue {
    /// Check if this value carries a time of day.
    ///
    /// Text counts as time-bearing when it contains the ISO `T` separator
    /// (either case);
    /// structured datetimes count when any time field is non-zero.
    pub fn has_time_component(&self) -> bool {
        match self {
            PeriodValue::Text(s) => s.contains(['T', 't']),
            PeriodValue::Date(_) => false,
            PeriodValue::DateTime(dt) => {
                dt.hour() != 0 || dt.minute() != 0 || dt.second() != 0 || dt.nanosecond() != 0
            }
        }
    }

    /// Calendar date of this value, if it can be read as one.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            PeriodValue::Date(d) => Some(*d),
            PeriodValue::DateTime(dt) => Some(dt.date_naive()),
            PeriodValue::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())),
        }
    }

    /// Fixed-offset timestamp of this value, if it carries one.
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            PeriodValue::DateTime(dt) => Some(*dt),
            PeriodValue::Text(s) => DateTime::parse_from_rfc3339(s).ok(),
            PeriodValue::Date(_) => None,
        }
    }
}

impl std::fmt::Display for PeriodValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodValue::Text(s) => write!(f, "{s}"),
            PeriodValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PeriodValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<NaiveDate> for PeriodValue {
    fn from(d: NaiveDate) -> Self {
        PeriodValue::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for PeriodValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        PeriodValue::DateTime(dt)
    }
}

impl From<&str> for PeriodValue {
    fn from(s: &str) -> Self {
        PeriodValue::Text(s.to_string())
    }
}

/// `{start, end?}` span attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: PeriodValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<PeriodValue>,
}

impl Period {
    pub fn new(start: impl Into<PeriodValue>, end: Option<PeriodValue>) -> Self {
        Self {
            start: start.into(),
            end,
        }
    }

    /// Date-only span as stored on containers.
    pub fn dates(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            start: PeriodValue::Date(start),
            end: end.map(PeriodValue::Date),
        }
    }

    /// Time-bearing span as stored on sessions.
    pub fn from_slot(slot: &Slot) -> Self {
        Self {
            start: PeriodValue::DateTime(slot.start),
            end: Some(PeriodValue::DateTime(slot.end)),
        }
    }
}

/// Reject any `start`/`end` that carries a time of day.
///
/// # Errors
///
/// Returns [`SchedulingError::TimeComponentNotAllowed`] for the first
/// offending side, prefixed with `context`.
pub fn validate_date_only(period: &Period, context: &str) -> Result<(), SchedulingError> {
    for value in std::iter::once(&period.start).chain(period.end.as_ref()) {
        if value.has_time_component() {
            return Err(SchedulingError::TimeComponentNotAllowed {
                context: context.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}
