//! Clock-style rendering of durations and wall-clock labels.

use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::error::{CoreError, Result};

/// Format a duration in seconds as `MM:SS`, or `H:MM:SS` once it reaches an hour.
///
/// The sign is dropped: overrun counters are negative but render the same way
/// as the countdown they replace.
pub fn format_duration(seconds: i64) -> String {
    let total = seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Parse `MM:SS` or `H:MM:SS` back into seconds.
///
/// # Errors
/// Returns `CoreError::InvalidDuration` when the string has the wrong shape
/// or a minute/second field is 60 or above.
pub fn parse_duration(text: &str) -> Result<u64> {
    let invalid = || CoreError::InvalidDuration(text.to_string());
    let fields = text
        .trim()
        .split(':')
        .map(|part| part.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    let (hours, minutes, secs) = match fields.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };
    if minutes >= 60 || secs >= 60 {
        return Err(invalid());
    }
    hours
        .checked_mul(3600)
        .and_then(|total| total.checked_add(minutes * 60 + secs))
        .ok_or_else(invalid)
}

/// Current local time advanced by `offset_seconds`, as `H:MM am`.
pub fn clock_label(offset_seconds: i64) -> String {
    clock_label_at(&Local::now(), offset_seconds)
}

/// [`clock_label`] against an explicit `now`.
pub fn clock_label_at<Tz: TimeZone>(now: &DateTime<Tz>, offset_seconds: i64) -> String {
    let at = now.clone() + chrono::Duration::seconds(offset_seconds);
    let (is_pm, hour) = at.hour12();
    let suffix = if is_pm { "pm" } else { "am" };
    format!("{}:{:02} {}", hour, at.minute(), suffix)
}
