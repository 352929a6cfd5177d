//! The contextual date engine
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      ContextualDate                          │
//! │                                                              │
//! │  format / format_at                                          │
//! │     │                                                        │
//! │     ├── parse_date ──────────── DateInput -> DateTime<Utc>   │
//! │     ├── now ─────────────────── NowCache + Clock             │
//! │     ├── relative::classify ──── Thresholds + LanguagePack    │
//! │     │                             ▲                          │
//! │     │                  resolve(config, ambient, table)       │
//! │     ├── absolute::classify ──── FullDateFormats              │
//! │     │                             │                          │
//! │     │                      AbsoluteFormatter                 │
//! │     └── template (%fullDate% / %relativeDate%)               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use contextual_date_core::{Config, ContextualDate};
//!
//! let engine = ContextualDate::new(Config::default());
//! let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//!
//! let three_days_ago = now - Duration::days(3);
//! assert_eq!(engine.format_relative(three_days_ago, Some(now)), "3 days ago");
//! assert_eq!(
//!     engine.format_at(three_days_ago, Some(now), None),
//!     "June 12 at 12:00 PM (3 days ago)"
//! );
//!
//! // Unparseable input comes back untouched
//! assert_eq!(engine.format("garbage", None), "garbage");
//! ```

use crate::absolute::{self, AbsoluteFormatter};
use crate::clock::{Clock, NowCache, SystemClock};
use crate::config::{Config, FULL_DATE_PLACEHOLDER, RELATIVE_DATE_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::language::{
    self, AmbientLanguage, LanguagePack, LanguageTable, NoAmbientLanguage, ResolvedLanguage,
};
use crate::parse::{self, DateInput};
use crate::pattern::PatternFormatter;
use crate::relative;
use chrono::{DateTime, Utc};

/// Formats instants as relative and absolute contextual text.
///
/// One engine owns its configuration, language table and "now" cache;
/// engines never share state. Formatting takes `&self` and the engine is
/// `Send + Sync`, so it can be shared behind an `Arc`.
pub struct ContextualDate {
    config: Config,
    languages: LanguageTable,
    clock: Box<dyn Clock>,
    ambient: Box<dyn AmbientLanguage>,
    formatter: Box<dyn AbsoluteFormatter>,
    now_cache: NowCache,
}

impl ContextualDate {
    /// Create an engine using the system clock, no ambient language and the
    /// default pattern formatter. Language packs from `config.languages` are
    /// registered over the built-ins.
    pub fn new(config: Config) -> Self {
        let mut languages = LanguageTable::new();
        for (code, pack) in &config.languages {
            languages.register(code.clone(), pack.clone());
        }

        Self {
            config,
            languages,
            clock: Box::new(SystemClock),
            ambient: Box::new(NoAmbientLanguage),
            formatter: Box::new(PatternFormatter),
            now_cache: NowCache::new(),
        }
    }

    /// Replace the clock. Drops any cached "now" taken from the old clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self.now_cache.invalidate();
        self
    }

    /// Replace the ambient language provider.
    pub fn with_ambient_language(mut self, ambient: impl AmbientLanguage + 'static) -> Self {
        self.ambient = Box::new(ambient);
        self
    }

    /// Replace the absolute formatter.
    pub fn with_formatter(mut self, formatter: impl AbsoluteFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    // ============================================
    // Configuration and languages
    // ============================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration. Changes apply from the next call; the "now"
    /// cache is left alone.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    pub fn languages_mut(&mut self) -> &mut LanguageTable {
        &mut self.languages
    }

    /// Register (or overwrite) a language pack.
    pub fn register_language(
        &mut self,
        code: impl Into<String>,
        pack: LanguagePack,
    ) -> Option<LanguagePack> {
        self.languages.register(code, pack)
    }

    /// Resolve the language for the next call: configured, then ambient,
    /// then the default.
    pub fn resolve_language(&self) -> ResolvedLanguage<'_> {
        let ambient = self.ambient.language_code();
        language::resolve(
            self.config.language_code(),
            ambient.as_deref(),
            &self.languages,
        )
    }

    // ============================================
    // Time
    // ============================================

    /// The current instant, served from the cache while it is within
    /// `config.buffer_ms`.
    pub fn now(&self) -> DateTime<Utc> {
        self.now_cache.now(self.clock.as_ref(), self.config.buffer_ms)
    }

    /// Forget the cached "now" so the next read hits the clock.
    pub fn invalidate(&self) {
        self.now_cache.invalidate();
    }

    fn reference_or_now(&self, reference: Option<DateTime<Utc>>) -> DateTime<Utc> {
        match reference {
            Some(reference) => reference,
            None => self.now(),
        }
    }

    // ============================================
    // Formatting
    // ============================================

    /// Normalize an input into an instant.
    pub fn parse_date(&self, input: impl Into<DateInput>) -> Result<DateTime<Utc>> {
        parse::parse_date(&input.into())
    }

    /// Relative phrase for `input` ("3 days ago"). Uses `reference` when
    /// given, otherwise the cached "now". Unparseable input is returned as is.
    pub fn format_relative(
        &self,
        input: impl Into<DateInput>,
        reference: Option<DateTime<Utc>>,
    ) -> String {
        let input = input.into();
        match parse::parse_date(&input) {
            Ok(target) => self.relative_phrase(target, self.reference_or_now(reference)),
            Err(e) => pass_through(input, &e),
        }
    }

    /// Absolute phrase for `input`, using the pattern for its display
    /// category. Unparseable input is returned as is.
    pub fn format_full(
        &self,
        input: impl Into<DateInput>,
        reference: Option<DateTime<Utc>>,
    ) -> String {
        let input = input.into();
        match parse::parse_date(&input) {
            Ok(target) => self.full_phrase(target, self.reference_or_now(reference)),
            Err(e) => pass_through(input, &e),
        }
    }

    /// Combined phrase built from `config.template`. `full_override` replaces
    /// the computed absolute phrase. Unparseable input is returned as is.
    pub fn format(&self, input: impl Into<DateInput>, full_override: Option<&str>) -> String {
        self.format_at(input, None, full_override)
    }

    /// [`ContextualDate::format`] against an explicit reference instant.
    pub fn format_at(
        &self,
        input: impl Into<DateInput>,
        reference: Option<DateTime<Utc>>,
        full_override: Option<&str>,
    ) -> String {
        let input = input.into();
        let target = match parse::parse_date(&input) {
            Ok(target) => target,
            Err(e) => return pass_through(input, &e),
        };

        // Both phrases describe the same "now"
        let reference = self.reference_or_now(reference);
        let relative = self.relative_phrase(target, reference);
        if self.config.hide_full_date {
            return relative;
        }

        let full = match full_override {
            Some(text) => text.to_string(),
            None => self.full_phrase(target, reference),
        };
        compose(&self.config.template, &full, &relative)
    }

    fn relative_phrase(&self, target: DateTime<Utc>, reference: DateTime<Utc>) -> String {
        let language = self.resolve_language();
        relative::classify(target, reference, &self.config.thresholds, language.pack)
    }

    fn full_phrase(&self, target: DateTime<Utc>, reference: DateTime<Utc>) -> String {
        let category = absolute::classify(target, reference);
        let pattern = self.config.full_date_formats.pattern(category);
        self.formatter.format(target, pattern)
    }
}

impl Default for ContextualDate {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn pass_through(input: DateInput, error: &Error) -> String {
    tracing::debug!(input = %input, error = %error, "Passing unparseable date through");
    input.into_original()
}

/// Fill `template`'s placeholders in one pass; substituted text is never
/// rescanned.
pub fn compose(template: &str, full: &str, relative: &str) -> String {
    let mut out = String::with_capacity(template.len() + full.len() + relative.len());
    let mut rest = template;

    loop {
        let next_full = rest.find(FULL_DATE_PLACEHOLDER);
        let next_relative = rest.find(RELATIVE_DATE_PLACEHOLDER);

        let (index, placeholder, value) = match (next_full, next_relative) {
            (Some(f), Some(r)) if f < r => (f, FULL_DATE_PLACEHOLDER, full),
            (_, Some(r)) => (r, RELATIVE_DATE_PLACEHOLDER, relative),
            (Some(f), None) => (f, FULL_DATE_PLACEHOLDER, full),
            (None, None) => break,
        };

        out.push_str(&rest[..index]);
        out.push_str(value);
        rest = &rest[index + placeholder.len()..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_default_template() {
        assert_eq!(
            compose("%fullDate% (%relativeDate%)", "June 12", "3 days ago"),
            "June 12 (3 days ago)"
        );
    }

    #[test]
    fn test_compose_does_not_rescan_values() {
        assert_eq!(
            compose("%fullDate% / %relativeDate%", "%relativeDate%", "x"),
            "%relativeDate% / x"
        );
    }

    #[test]
    fn test_compose_repeated_and_missing_placeholders() {
        assert_eq!(compose("%relativeDate%!%relativeDate%", "f", "r"), "r!r");
        assert_eq!(compose("static text", "f", "r"), "static text");
        assert_eq!(compose("", "f", "r"), "");
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ContextualDate>();
    }
}
