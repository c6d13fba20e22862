//! Cascading reschedule of a chain of sessions.
//!
//! Given the sessions of a container in their current order and a new anchor
//! date, each session is placed on the window start of the cursor date and
//! the cursor then rolls to the next business day. Order and durations are
//! preserved; every produced slot passes the [`SlotEnforcer`].
//!
//! The fold is sequential: each placement depends on the previous one. On
//! the first failure the cascade stops and hands back what it already
//! computed, so the caller can decide whether to apply a partial cascade.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::business_day::next_business_day;
use crate::duration::parse_duration;
use crate::error::SchedulingError;
use crate::slot::{Slot, SlotEnforcer};
use crate::store::SessionRecord;

/// New placement computed for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotUpdate {
    pub id: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl SlotUpdate {
    pub fn slot(&self) -> Slot {
        Slot {
            start: self.start,
            end: self.end,
        }
    }
}

/// A cascade that stopped early.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Reschedule stopped at session '{failed_id}' after {} placed: {source}", .completed.len())]
pub struct RescheduleError {
    /// Updates computed before the failing session, in order.
    pub completed: Vec<SlotUpdate>,
    pub failed_id: String,
    #[source]
    pub source: SchedulingError,
}

/// Re-anchors an ordered chain of sessions onto a new start date.
#[derive(Debug, Clone)]
pub struct Rescheduler {
    enforcer: SlotEnforcer,
    offset: FixedOffset,
}

impl Rescheduler {
    pub fn new(enforcer: SlotEnforcer, offset: FixedOffset) -> Self {
        Self { enforcer, offset }
    }

    pub fn enforcer(&self) -> &SlotEnforcer {
        &self.enforcer
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Place `sessions` one per business day starting at `new_start`.
    ///
    /// `sessions` must already be sorted by their current start.
    ///
    /// # Errors
    ///
    /// Returns a [`RescheduleError`] carrying every update computed before
    /// the first session whose duration is unparseable or does not fit.
    pub fn reschedule(
        &self,
        sessions: &[SessionRecord],
        new_start: NaiveDate,
    ) -> Result<Vec<SlotUpdate>, RescheduleError> {
        let mut updates = Vec::with_capacity(sessions.len());
        let mut cursor = new_start;

        for session in sessions {
            match self.place(session, cursor) {
                Ok(slot) => {
                    tracing::debug!(
                        session = %session.id,
                        start = %slot.start.to_rfc3339(),
                        end = %slot.end.to_rfc3339(),
                        "placed session"
                    );
                    cursor = next_business_day(slot.start.date_naive());
                    updates.push(SlotUpdate {
                        id: session.id.clone(),
                        start: slot.start,
                        end: slot.end,
                    });
                }
                Err(source) => {
                    tracing::warn!(
                        session = %session.id,
                        placed = updates.len(),
                        error = %source,
                        "reschedule cascade aborted"
                    );
                    return Err(RescheduleError {
                        completed: updates,
                        failed_id: session.id.clone(),
                        source,
                    });
                }
            }
        }

        Ok(updates)
    }

    fn place(&self, session: &SessionRecord, date: NaiveDate) -> Result<Slot, SchedulingError> {
        let minutes = parse_duration(&session.duration_text)?;
        let policy = self.enforcer.resolver().resolve_date(date);
        let (hour, minute) = policy.start_hour_minute();

        let candidate = date
            .and_hms_opt(hour, minute, 0)
            .and_then(|naive| naive.and_local_timezone(self.offset).single())
            .ok_or_else(|| SchedulingError::InvalidStartTime {
                expected: format!("{hour:02}:{minute:02}"),
                actual: date.to_string(),
            })?;

        self.enforcer.enforce(candidate, minutes)
    }
}

impl Default for Rescheduler {
    fn default() -> Self {
        Self::new(SlotEnforcer::default(), crate::config::default_offset())
    }
}
