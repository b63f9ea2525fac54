//! Countdown computation and compact terminal-style rendering.

use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Absolute distance to a due instant, split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// `true` when the due instant lies before `now`.
    pub is_overdue: bool,
    pub total_seconds: u64,
}

/// Computes the signed distance from `now` to `due`.
///
/// The absolute millisecond delta is decomposed with floor division; no
/// clamping is applied in either direction.
pub fn time_remaining(due: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let difference = due.signed_duration_since(now).num_milliseconds();
    let abs = difference.unsigned_abs();

    TimeRemaining {
        days: abs / MS_PER_DAY,
        hours: (abs % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (abs % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (abs % MS_PER_MINUTE) / MS_PER_SECOND,
        is_overdue: difference < 0,
        total_seconds: abs / MS_PER_SECOND,
    }
}

/// Renders a countdown from its largest non-zero unit downwards.
///
/// The leading field is unpadded; every following field has two digits:
/// `2d:03h:05m:10s`, `3h:12m:05s`, `9m:30s`, `45s`.
pub fn format_time_remaining(remaining: &TimeRemaining) -> String {
    let TimeRemaining {
        days,
        hours,
        minutes,
        seconds,
        ..
    } = *remaining;

    if days > 0 {
        format!("{days}d:{hours:02}h:{minutes:02}m:{seconds:02}s")
    } else if hours > 0 {
        format!("{hours}h:{minutes:02}m:{seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m:{seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Labelled countdown shown next to notes with a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub remaining: TimeRemaining,
}

impl Countdown {
    pub fn new(due: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            remaining: time_remaining(due, now),
        }
    }

    pub fn label(&self) -> &'static str {
        if self.remaining.is_overdue {
            "OVERDUE"
        } else {
            "DUE IN"
        }
    }
}

impl Display for Countdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.label(),
            format_time_remaining(&self.remaining)
        )
    }
}
