//! Absolute phrases chosen by calendar distance from the reference.
//!
//! Calendar fields are compared in UTC, largest unit first:
//!
//! | Relation to reference | Earlier / same | Later |
//! |-----------------------|----------------|-------|
//! | same day              | `today`        | `today` |
//! | same month            | `this_month`   | `next_month` |
//! | same year             | `this_year`    | `next_year` |
//! | different year        | `historical`   | `future` |

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// One of the seven absolute display categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullDateCategory {
    Today,
    ThisMonth,
    ThisYear,
    Historical,
    NextMonth,
    NextYear,
    Future,
}

impl FullDateCategory {
    pub const ALL: [FullDateCategory; 7] = [
        FullDateCategory::Today,
        FullDateCategory::ThisMonth,
        FullDateCategory::ThisYear,
        FullDateCategory::Historical,
        FullDateCategory::NextMonth,
        FullDateCategory::NextYear,
        FullDateCategory::Future,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FullDateCategory::Today => "today",
            FullDateCategory::ThisMonth => "this_month",
            FullDateCategory::ThisYear => "this_year",
            FullDateCategory::Historical => "historical",
            FullDateCategory::NextMonth => "next_month",
            FullDateCategory::NextYear => "next_year",
            FullDateCategory::Future => "future",
        }
    }
}

impl std::fmt::Display for FullDateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pattern per category, handed to the [`AbsoluteFormatter`] untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullDateFormats {
    pub today: String,
    pub this_month: String,
    pub this_year: String,
    pub historical: String,
    pub next_month: String,
    pub next_year: String,
    pub future: String,
}

impl Default for FullDateFormats {
    fn default() -> Self {
        Self {
            today: "h:mm a".to_string(),
            this_month: "MMMM d 'at' h:mm a".to_string(),
            this_year: "MMMM d".to_string(),
            historical: "MMMM d, yyyy".to_string(),
            next_month: "MMMM d 'at' h:mm a".to_string(),
            next_year: "MMMM d".to_string(),
            future: "MMMM d, yyyy".to_string(),
        }
    }
}

impl FullDateFormats {
    pub fn pattern(&self, category: FullDateCategory) -> &str {
        match category {
            FullDateCategory::Today => &self.today,
            FullDateCategory::ThisMonth => &self.this_month,
            FullDateCategory::ThisYear => &self.this_year,
            FullDateCategory::Historical => &self.historical,
            FullDateCategory::NextMonth => &self.next_month,
            FullDateCategory::NextYear => &self.next_year,
            FullDateCategory::Future => &self.future,
        }
    }

    pub fn pattern_mut(&mut self, category: FullDateCategory) -> &mut String {
        match category {
            FullDateCategory::Today => &mut self.today,
            FullDateCategory::ThisMonth => &mut self.this_month,
            FullDateCategory::ThisYear => &mut self.this_year,
            FullDateCategory::Historical => &mut self.historical,
            FullDateCategory::NextMonth => &mut self.next_month,
            FullDateCategory::NextYear => &mut self.next_year,
            FullDateCategory::Future => &mut self.future,
        }
    }
}

/// Classify `target` against `reference` by calendar distance.
pub fn classify(target: DateTime<Utc>, reference: DateTime<Utc>) -> FullDateCategory {
    let later = target > reference;

    let category = if target.date_naive() == reference.date_naive() {
        FullDateCategory::Today
    } else if target.year() == reference.year() && target.month() == reference.month() {
        if later {
            FullDateCategory::NextMonth
        } else {
            FullDateCategory::ThisMonth
        }
    } else if target.year() == reference.year() {
        if later {
            FullDateCategory::NextYear
        } else {
            FullDateCategory::ThisYear
        }
    } else if later {
        FullDateCategory::Future
    } else {
        FullDateCategory::Historical
    };

    tracing::trace!(category = %category, "Classified absolute date");
    category
}

/// Capability rendering an instant with a date pattern.
pub trait AbsoluteFormatter: Send + Sync {
    fn format(&self, instant: DateTime<Utc>, pattern: &str) -> String;
}

impl<F> AbsoluteFormatter for F
where
    F: Fn(DateTime<Utc>, &str) -> String + Send + Sync,
{
    fn format(&self, instant: DateTime<Utc>, pattern: &str) -> String {
        self(instant, pattern)
    }
}
