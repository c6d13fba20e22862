//! Daily study window policy.
//!
//! Every weekday gets one permitted window (default 19:00-21:00). Individual
//! weekdays may override it (Tuesday starts at 19:30), and year-agnostic
//! exception windows suppress those overrides so the default applies again
//! (the last two weeks of December and the first two of January).
//!
//! The table is plain configuration handed to [`WindowResolver`] at
//! construction; nothing here is global.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Permitted time-of-day range for a session, in fractional hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPolicy {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl WindowPolicy {
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Wall-clock hour and minute of the window start, truncated.
    pub fn start_hour_minute(&self) -> (u32, u32) {
        let hour = self.start_hour.trunc();
        let minute = ((self.start_hour - hour) * 60.0).trunc();
        (hour as u32, minute as u32)
    }

    /// Window start as a time of day, `None` if the hours are out of range.
    pub fn start_time(&self) -> Option<NaiveTime> {
        let (hour, minute) = self.start_hour_minute();
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    /// Minutes between window start and the hard stop.
    pub fn available_minutes(&self) -> i64 {
        ((self.end_hour - self.start_hour) * 60.0).round() as i64
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        let in_range = |h: f64| (0.0..=24.0).contains(&h);
        if !in_range(self.start_hour) || !in_range(self.end_hour) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!(
                    "hours must be within 0..=24, got {}-{}",
                    self.start_hour, self.end_hour
                ),
            });
        }
        if self.start_hour >= self.end_hour {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!(
                    "start_hour ({}) must be before end_hour ({})",
                    self.start_hour, self.end_hour
                ),
            });
        }
        Ok(())
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::new(19.0, 21.0)
    }
}

/// Inclusive month/day range that applies every year.
///
/// A range whose start falls after its end wraps over the new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionWindow {
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
}

impl ExceptionWindow {
    pub fn new(start_month: u32, start_day: u32, end_month: u32, end_day: u32) -> Self {
        Self {
            start_month,
            start_day,
            end_month,
            end_day,
        }
    }

    /// Check if `date` falls inside this window, ignoring the year.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let md = (date.month(), date.day());
        let start = (self.start_month, self.start_day);
        let end = (self.end_month, self.end_day);
        if start <= end {
            start <= md && md <= end
        } else {
            md >= start || md <= end
        }
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        // 2000 is a leap year, so Feb 29 is accepted.
        for (month, day) in [
            (self.start_month, self.start_day),
            (self.end_month, self.end_day),
        ] {
            if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("{month:02}-{day:02} is not a calendar day"),
                });
            }
        }
        Ok(())
    }
}

/// Weekday-specific replacement for the default window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayOverride {
    pub weekday: Weekday,
    #[serde(flatten)]
    pub policy: WindowPolicy,
}

/// The complete window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowPolicyTable {
    #[serde(default)]
    pub default: WindowPolicy,
    #[serde(default = "default_weekday_overrides")]
    pub weekday_overrides: Vec<WeekdayOverride>,
    #[serde(default = "default_exceptions")]
    pub exceptions: Vec<ExceptionWindow>,
}

fn default_weekday_overrides() -> Vec<WeekdayOverride> {
    vec![WeekdayOverride {
        weekday: Weekday::Tue,
        policy: WindowPolicy::new(19.5, 21.0),
    }]
}

fn default_exceptions() -> Vec<ExceptionWindow> {
    vec![
        ExceptionWindow::new(12, 18, 12, 31),
        ExceptionWindow::new(1, 1, 1, 14),
    ]
}

impl Default for WindowPolicyTable {
    fn default() -> Self {
        Self {
            default: WindowPolicy::default(),
            weekday_overrides: default_weekday_overrides(),
            exceptions: default_exceptions(),
        }
    }
}

impl WindowPolicyTable {
    /// Check every policy and exception in the table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default.validate("window.default")?;
        for (i, ov) in self.weekday_overrides.iter().enumerate() {
            ov.policy
                .validate(&format!("window.weekday_overrides[{i}]"))?;
        }
        for (i, ex) in self.exceptions.iter().enumerate() {
            ex.validate(&format!("window.exceptions[{i}]"))?;
        }
        Ok(())
    }

    /// Check if `date` falls inside any exception window.
    pub fn in_exception(&self, date: NaiveDate) -> bool {
        self.exceptions.iter().any(|ex| ex.contains(date))
    }
}

/// Resolves the permitted window for a weekday and calendar date.
#[derive(Debug, Clone, Default)]
pub struct WindowResolver {
    table: WindowPolicyTable,
}

impl WindowResolver {
    pub fn new(table: WindowPolicyTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &WindowPolicyTable {
        &self.table
    }

    /// Resolve the window for `weekday` on `date`.
    ///
    /// Always succeeds: weekdays without an override, and any date inside an
    /// exception window, get the default policy.
    pub fn resolve(&self, weekday: Weekday, date: NaiveDate) -> WindowPolicy {
        if self.table.in_exception(date) {
            return self.table.default;
        }
        self.table
            .weekday_overrides
            .iter()
            .find(|ov| ov.weekday == weekday)
            .map(|ov| ov.policy)
            .unwrap_or(self.table.default)
    }

    /// Resolve the window for `date` using its own weekday.
    pub fn resolve_date(&self, date: NaiveDate) -> WindowPolicy {
        self.resolve(date.weekday(), date)
    }
}
