//! Slot enforcement against the daily window.
//!
//! A session must start exactly on its day's window start and must end no
//! later than the window's hard stop. Anything else is rejected; nothing is
//! moved or clipped on the caller's behalf.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::window::WindowResolver;

/// A validated `[start, end)` placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Validates `(start, duration)` pairs against the resolved window.
#[derive(Debug, Clone, Default)]
pub struct SlotEnforcer {
    resolver: WindowResolver,
}

impl SlotEnforcer {
    pub fn new(resolver: WindowResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &WindowResolver {
        &self.resolver
    }

    /// Normalize `start` to the minute and compute the session end.
    ///
    /// # Errors
    ///
    /// - [`SchedulingError::ZeroOrNegativeDuration`] when `duration_minutes <= 0`
    /// - [`SchedulingError::InvalidStartTime`] when the wall-clock hour/minute
    ///   differs from the window start for that date
    /// - [`SchedulingError::DurationExceeded`] when the session would pass the
    ///   window end
    pub fn enforce(
        &self,
        start: DateTime<FixedOffset>,
        duration_minutes: i64,
    ) -> Result<Slot, SchedulingError> {
        if duration_minutes <= 0 {
            return Err(SchedulingError::ZeroOrNegativeDuration(duration_minutes));
        }

        let start = truncate_to_minute(start);
        let local_date = start.date_naive();
        let policy = self.resolver.resolve(local_date.weekday(), local_date);

        let (expected_hour, expected_minute) = policy.start_hour_minute();
        if start.hour() != expected_hour || start.minute() != expected_minute {
            return Err(SchedulingError::InvalidStartTime {
                expected: format!("{expected_hour:02}:{expected_minute:02}"),
                actual: format!("{:02}:{:02}", start.hour(), start.minute()),
            });
        }

        let available = policy.available_minutes();
        if duration_minutes > available {
            return Err(SchedulingError::DurationExceeded {
                requested: duration_minutes,
                available,
            });
        }

        Ok(Slot {
            start,
            end: start + Duration::minutes(duration_minutes),
        })
    }
}

fn truncate_to_minute(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    t - Duration::seconds(i64::from(t.second())) - Duration::nanoseconds(i64::from(t.nanosecond()))
}
