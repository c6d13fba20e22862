//! Card payload validation.
//!
//! Every entity created through the page store arrives as a JSON card
//! payload. The checks here are structural: a usable title, a status from
//! the family's enumeration, no conflicting parent, and a well-formed period.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CardError;
use crate::period::Period;

/// Maximum title length when no configuration is supplied.
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 2000;

/// Which database a card belongs to. Each has its own status set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatabaseFamily {
    Study,
    Work,
    Personal,
    VideoSeries,
}

impl DatabaseFamily {
    pub const ALL: [DatabaseFamily; 4] = [
        DatabaseFamily::Study,
        DatabaseFamily::Work,
        DatabaseFamily::Personal,
        DatabaseFamily::VideoSeries,
    ];

    /// Permitted status values for this family.
    pub fn statuses(&self) -> &'static [&'static str] {
        match self {
            DatabaseFamily::Study => &["Not started", "Scheduled", "In progress", "Done", "Cancelled"],
            DatabaseFamily::Work => &["Backlog", "To do", "In progress", "Blocked", "Done"],
            DatabaseFamily::Personal => &["Not started", "In progress", "Done", "Archived"],
            DatabaseFamily::VideoSeries => &["To watch", "Watching", "Watched", "Dropped"],
        }
    }

    pub fn accepts_status(&self, status: &str) -> bool {
        self.statuses().contains(&status)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseFamily::Study => "study",
            DatabaseFamily::Work => "work",
            DatabaseFamily::Personal => "personal",
            DatabaseFamily::VideoSeries => "video-series",
        }
    }
}

impl std::fmt::Display for DatabaseFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DatabaseFamily {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        DatabaseFamily::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| CardError::InvalidCardPayload(format!("unknown database family '{s}'")))
    }
}

/// Typed view of a validated card payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPayload {
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Structural validator for card payloads.
#[derive(Debug, Clone)]
pub struct CardValidator {
    max_title_length: usize,
}

impl Default for CardValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TITLE_LENGTH)
    }
}

impl CardValidator {
    pub fn new(max_title_length: usize) -> Self {
        Self { max_title_length }
    }

    /// Validate `payload` for `family`, optionally under `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns the first [`CardError`] found, checking title, status,
    /// parent relation and period in that order.
    pub fn validate(
        &self,
        payload: &Value,
        family: DatabaseFamily,
        parent_id: Option<&str>,
    ) -> Result<(), CardError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| CardError::InvalidCardPayload("payload must be a JSON object".into()))?;

        let title = match obj.get("title") {
            Some(Value::String(t)) if !t.trim().is_empty() => t,
            Some(Value::String(_)) | Some(Value::Null) | None => return Err(CardError::MissingTitle),
            Some(_) => {
                return Err(CardError::InvalidCardPayload("title must be a string".into()));
            }
        };
        let len = title.chars().count();
        if len > self.max_title_length {
            return Err(CardError::TitleTooLong {
                len,
                max: self.max_title_length,
            });
        }

        match obj.get("status") {
            None | Some(Value::Null) => {}
            Some(Value::String(status)) if family.accepts_status(status) => {}
            Some(other) => {
                return Err(CardError::UnknownStatus {
                    family: family.to_string(),
                    status: other.as_str().map_or_else(|| other.to_string(), str::to_string),
                });
            }
        }

        if let Some(requested) = parent_id {
            match obj.get("parent_id") {
                None | Some(Value::Null) => {}
                Some(Value::String(declared)) if declared == requested => {}
                Some(declared) => {
                    return Err(CardError::ConflictingParent {
                        declared: declared.as_str().map_or_else(|| declared.to_string(), str::to_string),
                        requested: requested.to_string(),
                    });
                }
            }
        }

        if let Some(period) = obj.get("period") {
            validate_period_shape(period)?;
        }

        Ok(())
    }

    /// Validate and convert into a [`CardPayload`].
    ///
    /// The requested `parent_id` fills in a payload that did not name one.
    ///
    /// # Errors
    ///
    /// Returns the validation error, or [`CardError::InvalidCardPayload`] if
    /// an optional field has the wrong type.
    pub fn parse(
        &self,
        payload: &Value,
        family: DatabaseFamily,
        parent_id: Option<&str>,
    ) -> Result<CardPayload, CardError> {
        self.validate(payload, family, parent_id)?;
        let mut card: CardPayload = serde_json::from_value(payload.clone())
            .map_err(|e| CardError::InvalidCardPayload(e.to_string()))?;
        if card.parent_id.is_none() {
            card.parent_id = parent_id.map(str::to_string);
        }
        Ok(card)
    }
}

/// Validate with default limits.
///
/// # Errors
///
/// See [`CardValidator::validate`].
pub fn validate_card_data(
    payload: &Value,
    family: DatabaseFamily,
    parent_id: Option<&str>,
) -> Result<(), CardError> {
    CardValidator::default().validate(payload, family, parent_id)
}

fn validate_period_shape(period: &Value) -> Result<(), CardError> {
    let invalid = |msg: &str| CardError::InvalidCardPayload(format!("period {msg}"));

    let obj = match period {
        Value::Null => return Ok(()),
        Value::Object(obj) => obj,
        _ => return Err(invalid("must be an object with 'start' and optional 'end'")),
    };

    if let Some(key) = obj.keys().find(|k| *k != "start" && *k != "end") {
        return Err(invalid(&format!("has unexpected key '{key}'")));
    }
    match obj.get("start") {
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(Value::String(_)) | Some(Value::Null) | None => return Err(invalid("is missing 'start'")),
        Some(_) => return Err(invalid("'start' must be a string")),
    }
    match obj.get("end") {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(invalid("'end' must be a string or null")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_card() {
        assert!(validate_card_data(&json!({"title": "Linear algebra"}), DatabaseFamily::Study, None).is_ok());
    }

    #[test]
    fn rejects_missing_or_blank_title() {
        for payload in [json!({}), json!({"title": "   "}), json!({"title": null})] {
            assert_eq!(
                validate_card_data(&payload, DatabaseFamily::Study, None),
                Err(CardError::MissingTitle)
            );
        }
    }

    #[test]
    fn rejects_overlong_title() {
        let validator = CardValidator::new(5);
        assert_eq!(
            validator.validate(&json!({"title": "abcdef"}), DatabaseFamily::Work, None),
            Err(CardError::TitleTooLong { len: 6, max: 5 })
        );
        // counted in characters, not bytes
        assert!(validator.validate(&json!({"title": "ééééé"}), DatabaseFamily::Work, None).is_ok());
    }

    #[test]
    fn status_must_belong_to_family() {
        let payload = json!({"title": "Episode 3", "status": "Watching"});
        assert!(validate_card_data(&payload, DatabaseFamily::VideoSeries, None).is_ok());
        assert_eq!(
            validate_card_data(&payload, DatabaseFamily::Study, None),
            Err(CardError::UnknownStatus {
                family: "study".to_string(),
                status: "Watching".to_string()
            })
        );
    }

    #[test]
    fn conflicting_parent_is_rejected() {
        let payload = json!({"title": "Phase 1", "parent_id": "course-a"});
        assert!(validate_card_data(&payload, DatabaseFamily::Study, Some("course-a")).is_ok());
        assert!(validate_card_data(&payload, DatabaseFamily::Study, None).is_ok());
        assert_eq!(
            validate_card_data(&payload, DatabaseFamily::Study, Some("course-b")),
            Err(CardError::ConflictingParent {
                declared: "course-a".to_string(),
                requested: "course-b".to_string()
            })
        );
    }

    #[test]
    fn period_requires_start() {
        let ok = json!({"title": "t", "period": {"start": "2025-10-22", "end": null}});
        assert!(validate_card_data(&ok, DatabaseFamily::Study, None).is_ok());

        for bad in [
            json!({"title": "t", "period": {"end": "2025-10-22"}}),
            json!({"title": "t", "period": "2025-10-22"}),
            json!({"title": "t", "period": {"start": "2025-10-22", "until": "x"}}),
            json!({"title": "t", "period": {"start": 20251022}}),
        ] {
            assert!(matches!(
                validate_card_data(&bad, DatabaseFamily::Study, None),
                Err(CardError::InvalidCardPayload(_))
            ));
        }
    }

    #[test]
    fn parse_fills_parent_from_request() {
        let card = CardValidator::default()
            .parse(
                &json!({"title": "Section 2", "status": "Scheduled", "tags": ["math"]}),
                DatabaseFamily::Study,
                Some("phase-1"),
            )
            .unwrap();
        assert_eq!(card.parent_id.as_deref(), Some("phase-1"));
        assert_eq!(card.tags, vec!["math".to_string()]);
    }

    #[test]
    fn family_parses_case_insensitively() {
        assert_eq!("Video_Series".parse::<DatabaseFamily>(), Ok(DatabaseFamily::VideoSeries));
        assert_eq!("STUDY".parse::<DatabaseFamily>(), Ok(DatabaseFamily::Study));
        assert!("movies".parse::<DatabaseFamily>().is_err());
    }
}
