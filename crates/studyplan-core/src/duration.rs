//! Duration text codec.
//!
//! The page store keeps session lengths as `HH:MM:SS` text. `HH:MM` is also
//! accepted on input; seconds are dropped when converting to minutes.

use crate::error::SchedulingError;

/// Parse `HH:MM:SS` or `HH:MM` into whole minutes.
///
/// # Errors
///
/// Returns [`SchedulingError::UnparseableDuration`] for anything else,
/// including minute or second fields of 60 or more.
pub fn parse_duration(text: &str) -> Result<i64, SchedulingError> {
    let unparseable = || SchedulingError::UnparseableDuration(text.to_string());

    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(unparseable());
    }

    let mut fields = [0i64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unparseable());
        }
        *slot = part.parse().map_err(|_| unparseable())?;
    }

    let [hours, minutes, seconds] = fields;
    if minutes >= 60 || seconds >= 60 {
        return Err(unparseable());
    }
    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .ok_or_else(unparseable)
}

/// Format whole minutes as `HH:MM:SS`.
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}
