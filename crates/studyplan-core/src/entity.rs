//! Study entities: sessions (classes) and their containers.
//!
//! Containers (course > phase > section) carry date-only periods. Sessions
//! carry an exact window-aligned slot and are changed only by a status
//! transition or a full reschedule; there is no partial time patch.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::card::{CardValidator, DatabaseFamily};
use crate::duration::format_duration;
use crate::error::{CardError, CoreError, LifecycleError};
use crate::period::{validate_date_only, Period, PeriodValue};
use crate::reschedule::SlotUpdate;
use crate::slot::{Slot, SlotEnforcer};
use crate::store::SessionRecord;

/// Level of an entity in the study hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityLevel {
    Course,
    Phase,
    Section,
    Class,
}

impl EntityLevel {
    /// Containers hold date-only periods; only classes carry time.
    pub fn is_container(&self) -> bool {
        !matches!(self, EntityLevel::Class)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityLevel::Course => "Course",
            EntityLevel::Phase => "Phase",
            EntityLevel::Section => "Section",
            EntityLevel::Class => "Class",
        }
    }
}

/// Session status.
///
/// Valid transitions:
/// - NOT STARTED → SCHEDULED, CANCELLED
/// - SCHEDULED → IN PROGRESS, CANCELLED
/// - IN PROGRESS → DONE, SCHEDULED (interrupted), CANCELLED
/// - DONE, CANCELLED are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "Not started")]
    NotStarted,
    Scheduled,
    #[serde(rename = "In progress")]
    InProgress,
    Done,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "Not started",
            SessionStatus::Scheduled => "Scheduled",
            SessionStatus::InProgress => "In progress",
            SessionStatus::Done => "Done",
            SessionStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &SessionStatus) -> bool {
        match self {
            SessionStatus::NotStarted => {
                matches!(to, SessionStatus::Scheduled | SessionStatus::Cancelled)
            }
            SessionStatus::Scheduled => {
                matches!(to, SessionStatus::InProgress | SessionStatus::Cancelled)
            }
            SessionStatus::InProgress => matches!(
                to,
                SessionStatus::Done | SessionStatus::Scheduled | SessionStatus::Cancelled
            ),
            SessionStatus::Done | SessionStatus::Cancelled => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Done | SessionStatus::Cancelled)
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Scheduled
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SessionStatus::NotStarted,
            SessionStatus::Scheduled,
            SessionStatus::InProgress,
            SessionStatus::Done,
            SessionStatus::Cancelled,
        ]
        .into_iter()
        .find(|st| st.as_str() == s)
        .ok_or_else(|| CardError::UnknownStatus {
            family: DatabaseFamily::Study.to_string(),
            status: s.to_string(),
        })
    }
}

/// A single scheduled class.
///
/// Time and status are read-only from outside; they change through
/// [`Session::apply`] and [`Session::transition_to`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub parent_id: String,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    duration_minutes: i64,
    status: SessionStatus,
}

impl Session {
    /// Validate the card and the slot, then build the session.
    ///
    /// The payload status defaults to `Scheduled`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Card`] for payload problems and
    /// [`CoreError::Scheduling`] when the slot breaks the window rules.
    pub fn create(
        id: impl Into<String>,
        payload: &Value,
        parent_id: &str,
        start: DateTime<FixedOffset>,
        duration_minutes: i64,
        validator: &CardValidator,
        enforcer: &SlotEnforcer,
    ) -> Result<Self, CoreError> {
        let card = validator.parse(payload, DatabaseFamily::Study, Some(parent_id))?;
        let status = card
            .status
            .as_deref()
            .map(str::parse::<SessionStatus>)
            .transpose()?
            .unwrap_or_default();
        let slot = enforcer.enforce(start, duration_minutes)?;

        Ok(Self {
            id: id.into(),
            title: card.title,
            parent_id: parent_id.to_string(),
            start: slot.start,
            end: slot.end,
            duration_minutes,
            status,
        })
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn slot(&self) -> Slot {
        Slot {
            start: self.start,
            end: self.end,
        }
    }

    /// Move to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] if the move is not allowed.
    pub fn transition_to(&mut self, status: SessionStatus) -> Result<(), LifecycleError> {
        if !self.status.can_transition_to(&status) {
            return Err(LifecycleError::InvalidTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        Ok(())
    }

    /// Replace start and end together from a computed reschedule.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::WrongSession`] if the update targets another
    /// id and [`LifecycleError::DurationMismatch`] if it changes the length.
    pub fn apply(&mut self, update: &SlotUpdate) -> Result<(), LifecycleError> {
        if update.id != self.id {
            return Err(LifecycleError::WrongSession {
                session: self.id.clone(),
                update: update.id.clone(),
            });
        }
        let actual = update.slot().duration_minutes();
        if actual != self.duration_minutes {
            return Err(LifecycleError::DurationMismatch {
                expected: self.duration_minutes,
                actual,
            });
        }
        self.start = update.start;
        self.end = update.end;
        Ok(())
    }

    /// Store-side view of this session.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            id: self.id.clone(),
            container_id: self.parent_id.clone(),
            start: PeriodValue::DateTime(self.start),
            end: Some(PeriodValue::DateTime(self.end)),
            duration_text: format_duration(self.duration_minutes),
        }
    }
}

/// A grouping node: course, phase or section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub title: String,
    pub level: EntityLevel,
    pub parent_id: Option<String>,
    pub period: Option<Period>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tags: Vec<String>,
}

impl Container {
    /// Validate the card and its date-only period, then build the container.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::InvalidCardPayload`] for a non-container level,
    /// [`CardError::Period`] when the period carries a time, or any other
    /// card validation error.
    pub fn create(
        id: impl Into<String>,
        payload: &Value,
        level: EntityLevel,
        parent_id: Option<&str>,
        validator: &CardValidator,
    ) -> Result<Self, CardError> {
        if !level.is_container() {
            return Err(CardError::InvalidCardPayload(format!(
                "{} is not a container level",
                level.label()
            )));
        }
        let card = validator.parse(payload, DatabaseFamily::Study, parent_id)?;
        if let Some(period) = &card.period {
            validate_date_only(period, &format!("{} period", level.label()))?;
        }

        Ok(Self {
            id: id.into(),
            title: card.title,
            level,
            parent_id: card.parent_id,
            period: card.period,
            status: card.status,
            priority: card.priority,
            tags: card.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulingError;
    use serde_json::json;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn session() -> Session {
        Session::create(
            "class-1",
            &json!({"title": "Eigenvalues"}),
            "section-1",
            at("2025-11-03T19:00:00-03:00"),
            60,
            &CardValidator::default(),
            &SlotEnforcer::default(),
        )
        .unwrap()
    }

    #[test]
    fn create_session_computes_end_and_default_status() {
        let s = session();
        assert_eq!(s.end(), at("2025-11-03T20:00:00-03:00"));
        assert_eq!(s.status(), SessionStatus::Scheduled);
        assert_eq!(s.to_record().duration_text, "01:00:00");
    }

    #[test]
    fn create_session_rejects_bad_slot() {
        let err = Session::create(
            "class-2",
            &json!({"title": "Late start"}),
            "section-1",
            at("2025-11-03T19:15:00-03:00"),
            60,
            &CardValidator::default(),
            &SlotEnforcer::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Scheduling(SchedulingError::InvalidStartTime { .. })
        ));
    }

    #[test]
    fn status_transitions_follow_lifecycle() {
        let mut s = session();
        assert!(s.transition_to(SessionStatus::InProgress).is_ok());
        assert!(s.transition_to(SessionStatus::Done).is_ok());
        assert_eq!(
            s.transition_to(SessionStatus::Scheduled),
            Err(LifecycleError::InvalidTransition {
                from: "Done".to_string(),
                to: "Scheduled".to_string()
            })
        );
    }

    #[test]
    fn apply_replaces_both_ends() {
        let mut s = session();
        let update = SlotUpdate {
            id: "class-1".into(),
            start: at("2025-11-05T19:00:00-03:00"),
            end: at("2025-11-05T20:00:00-03:00"),
        };
        s.apply(&update).unwrap();
        assert_eq!(s.slot(), update.slot());
    }

    #[test]
    fn apply_rejects_duration_change_and_foreign_update() {
        let mut s = session();
        let stretched = SlotUpdate {
            id: "class-1".into(),
            start: at("2025-11-05T19:00:00-03:00"),
            end: at("2025-11-05T20:30:00-03:00"),
        };
        assert_eq!(
            s.apply(&stretched),
            Err(LifecycleError::DurationMismatch {
                expected: 60,
                actual: 90
            })
        );
        let foreign = SlotUpdate {
            id: "class-9".into(),
            ..stretched
        };
        assert!(matches!(s.apply(&foreign), Err(LifecycleError::WrongSession { .. })));
    }

    #[test]
    fn rejected_changes_leave_session_untouched() {
        let mut s = session();
        let before = s.clone();

        let stretched = SlotUpdate {
            id: "class-1".into(),
            start: at("2025-11-05T19:00:00-03:00"),
            end: at("2025-11-05T21:00:00-03:00"),
        };
        assert!(s.apply(&stretched).is_err());
        assert!(s.transition_to(SessionStatus::Done).is_err());
        assert_eq!(s, before);

        s.transition_to(SessionStatus::InProgress).unwrap();
        s.apply(&SlotUpdate {
            id: "class-1".into(),
            start: at("2025-11-05T19:00:00-03:00"),
            end: at("2025-11-05T20:00:00-03:00"),
        })
        .unwrap();
        assert_eq!(s.status(), SessionStatus::InProgress);
        assert_eq!(s.start(), at("2025-11-05T19:00:00-03:00"));
        assert_eq!(s.end(), at("2025-11-05T20:00:00-03:00"));
        assert_eq!(s.duration_minutes(), 60);
    }

    #[test]
    fn container_period_must_be_date_only() {
        let validator = CardValidator::default();
        let ok = Container::create(
            "phase-1",
            &json!({"title": "Foundations", "period": {"start": "2025-10-01", "end": "2025-12-15"}}),
            EntityLevel::Phase,
            Some("course-1"),
            &validator,
        )
        .unwrap();
        assert_eq!(ok.parent_id.as_deref(), Some("course-1"));

        let err = Container::create(
            "phase-2",
            &json!({"title": "Timed", "period": {"start": "2025-10-22T10:00:00"}}),
            EntityLevel::Phase,
            None,
            &validator,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CardError::Period(SchedulingError::TimeComponentNotAllowed {
                context: "Phase period".to_string(),
                value: "2025-10-22T10:00:00".to_string()
            })
        );
    }

    #[test]
    fn class_level_is_not_a_container() {
        let err = Container::create(
            "x",
            &json!({"title": "t"}),
            EntityLevel::Class,
            None,
            &CardValidator::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CardError::InvalidCardPayload(_)));
    }
}
