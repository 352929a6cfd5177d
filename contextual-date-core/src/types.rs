//! Core domain types for contextual-date
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Instant** | A point in time, always `DateTime<Utc>` inside the engine |
//! | **Reference** | The instant a target is described relative to (usually "now") |
//! | **Unit** | One of the buckets used to express elapsed time (millisecond .. year) |
//! | **Threshold** | Multiplier on a unit's length controlling promotion to that unit |
//! | **Category** | One of the seven absolute display buckets (today, this month, ...) |

use serde::{Deserialize, Serialize};

// ============================================
// Time Units
// ============================================

/// Unit used to express an elapsed duration.
///
/// Lengths are fixed approximations: a month is 30 days and a year is 365
/// days regardless of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Units ordered from largest to smallest, the order classification tests them in.
    pub const DESCENDING: [TimeUnit; 8] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Week,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
        TimeUnit::Millisecond,
    ];

    /// Natural length of the unit in milliseconds.
    pub const fn length_ms(&self) -> i64 {
        const SECOND: i64 = 1000;
        const MINUTE: i64 = SECOND * 60;
        const HOUR: i64 = MINUTE * 60;
        const DAY: i64 = HOUR * 24;

        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => SECOND,
            TimeUnit::Minute => MINUTE,
            TimeUnit::Hour => HOUR,
            TimeUnit::Day => DAY,
            TimeUnit::Week => DAY * 7,
            TimeUnit::Month => DAY * 30,
            TimeUnit::Year => DAY * 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Direction
// ============================================

/// Which side of the reference instant a target falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Target is before the reference ("3 days ago")
    Past,
    /// Target is after the reference ("in 3 days")
    Future,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Past => "past",
            Direction::Future => "future",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_lengths() {
        assert_eq!(TimeUnit::Second.length_ms(), 1_000);
        assert_eq!(TimeUnit::Minute.length_ms(), 60_000);
        assert_eq!(TimeUnit::Hour.length_ms(), 3_600_000);
        assert_eq!(TimeUnit::Day.length_ms(), 86_400_000);
        assert_eq!(TimeUnit::Week.length_ms(), 7 * 86_400_000);
        assert_eq!(TimeUnit::Month.length_ms(), 30 * 86_400_000);
        assert_eq!(TimeUnit::Year.length_ms(), 365 * 86_400_000);
    }

    #[test]
    fn test_descending_order() {
        let lengths: Vec<i64> = TimeUnit::DESCENDING.iter().map(|u| u.length_ms()).collect();
        assert!(lengths.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(TimeUnit::DESCENDING.last(), Some(&TimeUnit::Millisecond));
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(TimeUnit::Week.to_string(), "week");
        assert_eq!(format!("{}", TimeUnit::Millisecond), "millisecond");
    }
}
