use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::error::{TodoError, TodoResult};

pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &[
    CANONICAL_DATE_FORMAT,
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

fn parse_loose(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|date_time| date_time.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|date_time| date_time.date_naive())
        })
}

/// Parses a free-form date and returns it once its `YYYY-MM-DD` rendering
/// reads back as the same calendar day.
pub fn normalize_due_date(raw: &str) -> TodoResult<NaiveDate> {
    let date = parse_loose(raw).ok_or(TodoError::InvalidDate)?;

    let canonical = canonical_date(&date);
    if canonical.len() != 10 {
        return Err(TodoError::InvalidDate);
    }

    match NaiveDate::parse_from_str(&canonical, CANONICAL_DATE_FORMAT) {
        Ok(reparsed) if reparsed == date => Ok(date),
        _ => Err(TodoError::InvalidDate),
    }
}

pub fn canonical_date(date: &NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}
