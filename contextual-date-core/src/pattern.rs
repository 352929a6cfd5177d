//! Default [`AbsoluteFormatter`]: date patterns in the `MMMM d, yyyy` style.
//!
//! | Symbol | Output |
//! |--------|--------|
//! | `yyyy` / `yy` / `y` | padded year / two-digit year / year |
//! | `MMMM` / `MMM` / `MM` / `M` | `June` / `Jun` / `06` / `6` |
//! | `dd` / `d` | day of month |
//! | `EEEE` / `EEE` | `Saturday` / `Sat` |
//! | `HH` / `H` | hour 0-23 |
//! | `hh` / `h` | hour 1-12 |
//! | `mm` / `m` | minute |
//! | `ss` / `s` | second |
//! | `sss` | millisecond |
//! | `a` | `AM` / `PM` |
//! | `Z` | UTC offset, always `+0000` |
//!
//! Text between single quotes is copied verbatim and `''` is a literal quote.
//! Any other character is copied as is.

use crate::absolute::AbsoluteFormatter;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::iter::Peekable;
use std::str::Chars;

/// Renders the pattern symbols listed in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFormatter;

impl AbsoluteFormatter for PatternFormatter {
    fn format(&self, instant: DateTime<Utc>, pattern: &str) -> String {
        render(instant, pattern)
    }
}

/// Render `instant` with `pattern`.
pub fn render(instant: DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();

    while let Some(symbol) = chars.next() {
        if symbol == '\'' {
            push_quoted(&mut out, &mut chars);
            continue;
        }

        let mut width = 1;
        while chars.peek() == Some(&symbol) {
            chars.next();
            width += 1;
        }
        push_field(&mut out, instant, symbol, width);
    }

    out
}

/// Copy a quoted literal; the opening quote is already consumed.
fn push_quoted(out: &mut String, chars: &mut Peekable<Chars<'_>>) {
    if chars.peek() == Some(&'\'') {
        chars.next();
        out.push('\'');
        return;
    }

    while let Some(c) = chars.next() {
        if c != '\'' {
            out.push(c);
        } else if chars.peek() == Some(&'\'') {
            chars.next();
            out.push('\'');
        } else {
            return;
        }
    }
}

fn push_field(out: &mut String, dt: DateTime<Utc>, symbol: char, width: usize) {
    let field = match (symbol, width) {
        ('y', 1) => dt.year().to_string(),
        ('y', 2) => format!("{:02}", dt.year().rem_euclid(100)),
        ('y', _) => format!("{:0width$}", dt.year(), width = width),
        ('M', 1) => dt.month().to_string(),
        ('M', 2) => format!("{:02}", dt.month()),
        ('M', 3) => dt.format("%b").to_string(),
        ('M', _) => dt.format("%B").to_string(),
        ('d', 1) => dt.day().to_string(),
        ('d', _) => format!("{:02}", dt.day()),
        ('E', 1..=3) => dt.format("%a").to_string(),
        ('E', _) => dt.format("%A").to_string(),
        ('H', 1) => dt.hour().to_string(),
        ('H', _) => format!("{:02}", dt.hour()),
        ('h', 1) => dt.hour12().1.to_string(),
        ('h', _) => format!("{:02}", dt.hour12().1),
        ('m', 1) => dt.minute().to_string(),
        ('m', _) => format!("{:02}", dt.minute()),
        ('s', 1) => dt.second().to_string(),
        ('s', 2) => format!("{:02}", dt.second()),
        ('s', _) => format!("{:03}", dt.timestamp_subsec_millis()),
        ('a', _) => {
            if dt.hour12().0 {
                "PM".to_string()
            } else {
                "AM".to_string()
            }
        }
        ('Z', _) => dt.format("%z").to_string(),
        (other, _) => std::iter::repeat(other).take(width).collect(),
    };
    out.push_str(&field);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_long_dates() {
        assert_eq!(render(noon(), "MMMM d, yyyy"), "June 15, 2024");
        assert_eq!(render(noon(), "EEEE, MMMM d"), "Saturday, June 15");
        assert_eq!(render(noon(), "EEE, MMM d 'at' HH:mm"), "Sat, Jun 15 at 12:00");
        assert_eq!(render(noon(), "y"), "2024");
        assert_eq!(render(noon(), "yyyy"), "2024");
    }

    #[test]
    fn test_numeric_fields() {
        let dt = Utc.with_ymd_and_hms(2009, 3, 7, 8, 5, 9).unwrap() + Duration::milliseconds(42);
        assert_eq!(render(dt, "yy-MM-dd"), "09-03-07");
        assert_eq!(render(dt, "y/M/d"), "2009/3/7");
        assert_eq!(render(dt, "HH:mm:ss.sss"), "08:05:09.042");
        assert_eq!(render(dt, "H:m:s"), "8:5:9");
    }

    #[test]
    fn test_twelve_hour_clock() {
        assert_eq!(render(noon(), "h:mm a"), "12:00 PM");
        let just_after_midnight = Utc.with_ymd_and_hms(2024, 6, 15, 0, 5, 0).unwrap();
        assert_eq!(render(just_after_midnight, "h:mm a"), "12:05 AM");
        let evening = Utc.with_ymd_and_hms(2024, 6, 15, 21, 30, 0).unwrap();
        assert_eq!(render(evening, "hh:mm a"), "09:30 PM");
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(render(noon(), "h 'o''clock'"), "12 o'clock");
        assert_eq!(render(noon(), "''yy"), "'24");
        assert_eq!(render(noon(), "'unterminated"), "unterminated");
    }

    #[test]
    fn test_offset_and_unknown_symbols() {
        assert_eq!(render(noon(), "Z"), "+0000");
        assert_eq!(render(noon(), "QQ - yyyy"), "QQ - 2024");
    }

    #[test]
    fn test_formatter_trait() {
        assert_eq!(PatternFormatter.format(noon(), "MMM d"), "Jun 15");
    }
}
