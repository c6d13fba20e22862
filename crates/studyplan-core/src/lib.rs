//! # Studyplan Core Library
//!
//! This library provides the schedule integrity engine for study plans: every
//! class must sit inside its day's study window, and a whole chain of classes
//! can be re-anchored on a new date without breaking order or durations.
//! It is CLI-first: every operation is reachable from the `studyplan` binary.
//!
//! ## Architecture
//!
//! - **Window Policy**: per-weekday daily windows with year-agnostic
//!   exception ranges, injected as configuration
//! - **Slot Enforcement**: exact-start and hard-stop checks for a session
//! - **Periods**: date-only rule for courses, phases and sections
//! - **Rescheduler**: sequential cascade over business days
//! - **Cards**: structural validation of incoming card payloads
//! - **Store**: trait for the external page store plus an in-memory backend
//!
//! All computation is synchronous and pure; only [`PageStore`]
//! implementations touch the outside world.
//!
//! ## Key Components
//!
//! - [`WindowResolver`]: resolves the permitted window for a date
//! - [`SlotEnforcer`]: validates `(start, duration)` pairs
//! - [`Rescheduler`]: cascades a chain of sessions onto a new date
//! - [`CardValidator`]: checks card payloads at entity boundaries
//! - [`SchedulingConfig`]: TOML configuration

pub mod business_day;
pub mod card;
pub mod config;
pub mod duration;
pub mod entity;
pub mod error;
pub mod period;
pub mod reschedule;
pub mod slot;
pub mod store;
pub mod window;

pub use business_day::{is_business_day, next_business_day};
pub use card::{validate_card_data, CardPayload, CardValidator, DatabaseFamily};
pub use config::SchedulingConfig;
pub use duration::{format_duration, parse_duration};
pub use entity::{Container, EntityLevel, Session, SessionStatus};
pub use error::{CardError, ConfigError, CoreError, LifecycleError, SchedulingError, StoreError};
pub use period::{validate_date_only, Period, PeriodValue};
pub use reschedule::{RescheduleError, Rescheduler, SlotUpdate};
pub use slot::{Slot, SlotEnforcer};
pub use store::{
    reschedule_container, sort_by_start, ApplyMode, CascadeReport, InMemoryPageStore, PageStore,
    SessionRecord,
};
pub use window::{ExceptionWindow, WeekdayOverride, WindowPolicy, WindowPolicyTable, WindowResolver};
