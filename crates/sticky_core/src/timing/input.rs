//! Due-date form input conversion.
//!
//! Accepts what a `datetime-local` field produces (`YYYY-MM-DDTHH:MM`, local
//! time) as well as full RFC 3339 strings written by earlier saves.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const LOCAL_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses due-date input. Blank or unparseable input yields `None`.
pub fn parse_due_input(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    LOCAL_INPUT_FORMATS.iter().find_map(|format| {
        let naive = NaiveDateTime::parse_from_str(trimmed, format).ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    })
}

/// Renders an instant for a `datetime-local` field (UTC, minute precision).
pub fn format_due_input(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M").to_string()
}
