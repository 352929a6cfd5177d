//! Relative phrases ("3 days ago", "in 5 days", "just now").
//!
//! Classification tests units from largest to smallest and picks the first
//! one whose scaled threshold the elapsed time reaches. Thresholds are not
//! required to be ordered; an inconsistent set still yields the first match
//! in that fixed order.

use crate::language::LanguagePack;
use crate::types::{Direction, TimeUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Promotion thresholds for the relative classifier.
///
/// `now` is a raw millisecond window; every other field multiplies the
/// unit's natural length. With `week = 1.5`, eight days stay "8 days"
/// because eight days is short of 10.5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub now: f64,
    pub second: f64,
    pub minute: f64,
    pub hour: f64,
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            now: 0.0,
            second: 1.0,
            minute: 1.0,
            hour: 1.0,
            day: 1.0,
            week: 1.0,
            month: 1.0,
            year: 1.0,
        }
    }
}

impl Thresholds {
    /// Multiplier for a unit. Milliseconds are the fallback and have none.
    pub fn multiplier(&self, unit: TimeUnit) -> Option<f64> {
        match unit {
            TimeUnit::Millisecond => None,
            TimeUnit::Second => Some(self.second),
            TimeUnit::Minute => Some(self.minute),
            TimeUnit::Hour => Some(self.hour),
            TimeUnit::Day => Some(self.day),
            TimeUnit::Week => Some(self.week),
            TimeUnit::Month => Some(self.month),
            TimeUnit::Year => Some(self.year),
        }
    }
}

/// Result of bucketing a non-"now" duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeBucket {
    pub direction: Direction,
    pub unit: TimeUnit,
    /// Whole units elapsed, truncated
    pub count: i64,
}

/// Pick the unit for an elapsed magnitude in milliseconds.
pub fn select_unit(magnitude_ms: i64, thresholds: &Thresholds) -> TimeUnit {
    let magnitude = magnitude_ms as f64;
    TimeUnit::DESCENDING
        .into_iter()
        .find(|unit| match thresholds.multiplier(*unit) {
            Some(multiplier) => magnitude >= multiplier * unit.length_ms() as f64,
            None => true,
        })
        .unwrap_or(TimeUnit::Millisecond)
}

/// Bucket `target` against `reference`. `None` means "now".
pub fn bucket(
    target: DateTime<Utc>,
    reference: DateTime<Utc>,
    thresholds: &Thresholds,
) -> Option<RelativeBucket> {
    let delta_ms = (reference - target).num_milliseconds();
    let magnitude_ms = delta_ms.saturating_abs();

    if magnitude_ms as f64 <= thresholds.now {
        return None;
    }

    let direction = if delta_ms > 0 {
        Direction::Past
    } else {
        Direction::Future
    };
    let unit = select_unit(magnitude_ms, thresholds);

    Some(RelativeBucket {
        direction,
        unit,
        count: magnitude_ms / unit.length_ms(),
    })
}

/// Render a bucket with a language pack.
pub fn render(bucket: &RelativeBucket, pack: &LanguagePack) -> String {
    let (before, after) = match bucket.direction {
        Direction::Past => (&pack.prefix, &pack.suffix),
        Direction::Future => (&pack.future_prefix, &pack.future_suffix),
    };
    let count = bucket.count.to_string();
    let term = pack.terms(bucket.unit).for_count(bucket.count);

    [before.as_str(), count.as_str(), term, after.as_str()]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describe `target` relative to `reference`.
pub fn classify(
    target: DateTime<Utc>,
    reference: DateTime<Utc>,
    thresholds: &Thresholds,
    pack: &LanguagePack,
) -> String {
    match bucket(target, reference, thresholds) {
        Some(bucket) => {
            tracing::trace!(
                direction = bucket.direction.as_str(),
                unit = %bucket.unit,
                count = bucket.count,
                "Classified relative date"
            );
            render(&bucket, pack)
        }
        None => pack.now.clone(),
    }
}
