//! Date input normalization
//!
//! Every public formatting operation accepts anything convertible into a
//! [`DateInput`] and normalizes it into a `DateTime<Utc>` with
//! [`parse_date`]. Accepted shapes:
//!
//! - an instant (any `DateTime<Tz>`, converted to UTC)
//! - epoch milliseconds, as an integer or as a string of decimal digits with
//!   an optional sign
//! - RFC 3339 / ISO 8601 text (`2024-06-15T12:00:00.123Z`, `2024-06-15T12:00Z`,
//!   `2024-06-15`, `2024-06`); text without an offset is read as UTC
//! - RFC 2822 / RFC 1123 text (`Sat, 15 Jun 2024 12:00:00 GMT`)
//!
//! Anything else is [`Error::InvalidDate`].

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// ISO 8601 layouts with an offset but no seconds, which RFC 3339 rejects.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

/// Naive date-time layouts read as UTC, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A date in any of the shapes the engine accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// An already-normalized instant
    Instant(DateTime<Utc>),
    /// Milliseconds since the Unix epoch
    Millis(i64),
    /// Free-form text
    Text(String),
}

impl DateInput {
    /// The input rendered as text, used as the pass-through result for
    /// inputs that fail to parse.
    pub fn original(&self) -> String {
        match self {
            DateInput::Instant(dt) => dt.to_rfc3339(),
            DateInput::Millis(ms) => ms.to_string(),
            DateInput::Text(text) => text.clone(),
        }
    }

    /// Like [`DateInput::original`], without copying text inputs.
    pub fn into_original(self) -> String {
        match self {
            DateInput::Text(text) => text,
            other => other.original(),
        }
    }
}

impl std::fmt::Display for DateInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateInput::Text(text) => f.write_str(text),
            other => f.write_str(&other.original()),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(dt: DateTime<Tz>) -> Self {
        DateInput::Instant(dt.with_timezone(&Utc))
    }
}

impl From<i64> for DateInput {
    fn from(ms: i64) -> Self {
        DateInput::Millis(ms)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<&String> for DateInput {
    fn from(text: &String) -> Self {
        DateInput::Text(text.clone())
    }
}

impl From<&DateInput> for DateInput {
    fn from(input: &DateInput) -> Self {
        input.clone()
    }
}

/// Normalize an input into an instant.
pub fn parse_date(input: &DateInput) -> Result<DateTime<Utc>> {
    match input {
        DateInput::Instant(dt) => Ok(*dt),
        DateInput::Millis(ms) => from_millis(*ms),
        DateInput::Text(text) => parse_text(text),
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| Error::InvalidDate(format!("epoch milliseconds out of range: {}", ms)))
}

fn parse_text(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidDate("empty input".to_string()));
    }

    if is_integer_literal(trimmed) {
        let ms: i64 = trimmed.parse().map_err(|_| {
            Error::InvalidDate(format!("epoch milliseconds out of range: {}", trimmed))
        })?;
        return from_millis(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    // A trailing `Z` is UTC, the same as no offset at all
    let naive_text = trimmed.strip_suffix(['Z', 'z']).unwrap_or(trimmed);
    if let Some(dt) = parse_naive(naive_text) {
        return Ok(dt);
    }

    if let Some(date) = parse_year_month(trimmed) {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(Error::InvalidDate(format!("unrecognized date: {}", text)))
}

fn parse_naive(text: &str) -> Option<DateTime<Utc>> {
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(Utc.from_utc_datetime(&naive));
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `YYYY-MM`, read as the first day of the month.
fn parse_year_month(text: &str) -> Option<NaiveDate> {
    let (year, month) = text.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Decimal digits with an optional leading sign.
fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
