//! Relative completion dates and the terminal clock line.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Renders how long ago a note was completed.
///
/// Elapsed time is taken as an absolute value and bucketed by whole days:
/// - 0 days, 0 hours: `"{m} min ago"`
/// - 0 days: `"{h} hours ago"`
/// - 1 day: `"Yesterday"`
/// - 2..=6 days: `"{d} days ago"`
/// - otherwise the local calendar date as `M/D/YYYY`
pub fn format_completion_date(completed_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(completed_at).num_seconds().abs();
    let days = elapsed / SECONDS_PER_DAY;

    match days {
        0 => {
            let hours = elapsed / SECONDS_PER_HOUR;
            if hours == 0 {
                format!("{} min ago", elapsed / SECONDS_PER_MINUTE)
            } else {
                format!("{hours} hours ago")
            }
        }
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => format_calendar_date(&completed_at.with_timezone(&Local)),
    }
}

/// Formats a calendar date as `M/D/YYYY` in the instant's own time zone.
pub fn format_calendar_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%-m/%-d/%Y").to_string()
}

/// Renders the header clock line, e.g. `SUN JAN 05 2025 | 09:07:03`.
pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%a %b %d %Y | %H:%M:%S")
        .to_string()
        .to_ascii_uppercase()
}
