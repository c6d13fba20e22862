//! Page store seam.
//!
//! The workspace that persists cards lives outside this crate. [`PageStore`]
//! is the narrow surface the cascade needs: list the sessions of a container
//! and overwrite one session's period. [`InMemoryPageStore`] backs tests and
//! file-based CLI runs.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::period::{Period, PeriodValue};
use crate::reschedule::{RescheduleError, Rescheduler, SlotUpdate};

/// A session as the store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub container_id: String,
    pub start: PeriodValue,
    #[serde(default)]
    pub end: Option<PeriodValue>,
    /// Length as `HH:MM:SS` text.
    pub duration_text: String,
}

impl SessionRecord {
    /// Instant used to order records; bare dates sort at UTC midnight.
    pub fn start_key(&self) -> Option<DateTime<FixedOffset>> {
        self.start.datetime().or_else(|| {
            self.start
                .date()
                .map(|d: NaiveDate| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        })
    }
}

/// External persistence for session pages.
pub trait PageStore {
    /// All sessions belonging to `container_id`, in store order.
    fn query(&self, container_id: &str) -> Result<Vec<SessionRecord>, StoreError>;

    /// Overwrite the period of `session_id` and return the stored record.
    fn update(&mut self, session_id: &str, period: &Period) -> Result<SessionRecord, StoreError>;
}

/// Vec-backed store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryPageStore {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

impl InMemoryPageStore {
    pub fn new(sessions: Vec<SessionRecord>) -> Self {
        Self { sessions }
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionRecord> {
        self.sessions.iter().find(|s| s.id == session_id)
    }
}

impl PageStore for InMemoryPageStore {
    fn query(&self, container_id: &str) -> Result<Vec<SessionRecord>, StoreError> {
        let found: Vec<SessionRecord> = self
            .sessions
            .iter()
            .filter(|s| s.container_id == container_id)
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(StoreError::UnknownContainer(container_id.to_string()));
        }
        Ok(found)
    }

    fn update(&mut self, session_id: &str, period: &Period) -> Result<SessionRecord, StoreError> {
        let record = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| StoreError::UnknownSession(session_id.to_string()))?;
        record.start = period.start.clone();
        record.end = period.end.clone();
        Ok(record.clone())
    }
}

/// What to write when a cascade stops early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Write nothing unless every session was placed.
    #[default]
    AllOrNothing,
    /// Write the sessions placed before the failure.
    Partial,
}

/// Outcome of a store-driven cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeReport {
    /// Updates written to the store, in order.
    pub applied: Vec<SlotUpdate>,
    /// Set when the cascade stopped early.
    pub failure: Option<RescheduleError>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Sort records ascending by their current start.
///
/// Ties keep store order.
///
/// # Errors
///
/// Returns [`StoreError::MalformedRecord`] for a start that is not a date.
pub fn sort_by_start(records: &mut [SessionRecord]) -> Result<(), StoreError> {
    if let Some(bad) = records.iter().find(|r| r.start_key().is_none()) {
        return Err(StoreError::MalformedRecord {
            id: bad.id.clone(),
            message: format!("start '{}' is not a date", bad.start),
        });
    }
    records.sort_by_key(SessionRecord::start_key);
    Ok(())
}

/// Re-anchor every session of `container_id` at `new_start` and persist.
///
/// Sessions are ordered by their stored start before the cascade runs.
///
/// # Errors
///
/// Returns a [`StoreError`] if the query fails, a record is malformed or a
/// write fails. Writes made before a failing write are not rolled back.
pub fn reschedule_container<S: PageStore + ?Sized>(
    store: &mut S,
    rescheduler: &Rescheduler,
    container_id: &str,
    new_start: NaiveDate,
    mode: ApplyMode,
) -> Result<CascadeReport, StoreError> {
    let mut records = store.query(container_id)?;
    sort_by_start(&mut records)?;

    let (to_apply, failure) = match rescheduler.reschedule(&records, new_start) {
        Ok(updates) => (updates, None),
        Err(err) => match mode {
            ApplyMode::Partial => (err.completed.clone(), Some(err)),
            ApplyMode::AllOrNothing => (Vec::new(), Some(err)),
        },
    };

    for update in &to_apply {
        store.update(&update.id, &Period::from_slot(&update.slot()))?;
    }
    tracing::debug!(
        container = container_id,
        applied = to_apply.len(),
        complete = failure.is_none(),
        "cascade persisted"
    );

    Ok(CascadeReport {
        applied: to_apply,
        failure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, start: &str, duration: &str) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            container_id: "section-1".to_string(),
            start: PeriodValue::Text(start.to_string()),
            end: None,
            duration_text: duration.to_string(),
        }
    }

    #[test]
    fn sort_orders_by_instant_and_keeps_ties_stable() {
        let mut records = vec![
            record("late", "2025-10-03T19:00:00-03:00", "01:00:00"),
            record("early", "2025-10-01T19:00:00-03:00", "01:00:00"),
            record("tie", "2025-10-03T22:00:00+00:00", "01:00:00"),
        ];
        sort_by_start(&mut records).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["early", "late", "tie"]);
    }

    #[test]
    fn sort_rejects_unreadable_start() {
        let mut records = vec![record("x", "next week", "01:00:00")];
        assert!(matches!(
            sort_by_start(&mut records),
            Err(StoreError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn in_memory_query_and_update() {
        let mut store = InMemoryPageStore::new(vec![record("a", "2025-10-01", "01:00:00")]);
        assert_eq!(store.query("section-1").unwrap().len(), 1);
        assert_eq!(
            store.query("nope"),
            Err(StoreError::UnknownContainer("nope".to_string()))
        );

        let updated = store
            .update("a", &Period::new("2025-11-03T19:00:00-03:00", Some("2025-11-03T20:00:00-03:00".into())))
            .unwrap();
        assert_eq!(updated.start.to_string(), "2025-11-03T19:00:00-03:00");
        assert!(store.update("b", &Period::new("2025-11-03", None)).is_err());
    }

    #[test]
    fn all_or_nothing_writes_nothing_on_failure() {
        let mut store = InMemoryPageStore::new(vec![
            record("a", "2025-10-01T19:00:00-03:00", "01:00:00"),
            record("b", "2025-10-02T19:00:00-03:00", "bad"),
        ]);
        let before = store.clone();
        let monday = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();

        let report = reschedule_container(
            &mut store,
            &Rescheduler::default(),
            "section-1",
            monday,
            ApplyMode::AllOrNothing,
        )
        .unwrap();

        assert!(!report.is_complete());
        assert!(report.applied.is_empty());
        assert_eq!(store, before);
    }

    #[test]
    fn partial_mode_writes_completed_prefix() {
        let mut store = InMemoryPageStore::new(vec![
            record("b", "2025-10-02T19:00:00-03:00", "bad"),
            record("a", "2025-10-01T19:00:00-03:00", "01:00:00"),
        ]);
        let monday = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();

        let report = reschedule_container(
            &mut store,
            &Rescheduler::default(),
            "section-1",
            monday,
            ApplyMode::Partial,
        )
        .unwrap();

        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.failure.as_ref().map(|f| f.failed_id.as_str()), Some("b"));
        assert_eq!(
            store.get("a").unwrap().start.to_string(),
            "2025-11-03T19:00:00-03:00"
        );
        assert_eq!(store.get("b").unwrap().start.to_string(), "2025-10-02T19:00:00-03:00");
    }
}
