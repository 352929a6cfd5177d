//! Language packs, the language table and language resolution
//!
//! A [`LanguagePack`] carries every display term the relative classifier
//! needs. Packs are all-or-nothing: every field is required, so a pack that
//! is missing a term cannot be built or deserialized.
//!
//! Resolution runs on every formatting call:
//! 1. the configured code, if non-empty and registered
//! 2. the ambient code (see [`AmbientLanguage`]), if registered
//! 3. [`DEFAULT_LANGUAGE`]
//!
//! Unknown codes are skipped silently.

use crate::types::TimeUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Language code that is always present in a [`LanguageTable`].
pub const DEFAULT_LANGUAGE: &str = "en_US";

// ============================================
// Language Packs
// ============================================

/// Singular and plural term for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTerms {
    pub singular: String,
    pub plural: String,
}

impl UnitTerms {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Pick the singular term iff `count == 1`.
    pub fn for_count(&self, count: i64) -> &str {
        if count == 1 {
            &self.singular
        } else {
            &self.plural
        }
    }
}

/// Display terms for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePack {
    /// Placed before the count for past dates
    pub prefix: String,
    /// Placed after the unit for past dates ("ago")
    pub suffix: String,
    /// Placed before the count for future dates ("in")
    pub future_prefix: String,
    /// Placed after the unit for future dates
    pub future_suffix: String,
    /// Returned verbatim when the target is within the "now" threshold
    pub now: String,
    pub millisecond: UnitTerms,
    pub second: UnitTerms,
    pub minute: UnitTerms,
    pub hour: UnitTerms,
    pub day: UnitTerms,
    pub week: UnitTerms,
    pub month: UnitTerms,
    pub year: UnitTerms,
}

impl LanguagePack {
    /// The built-in `en_US` pack.
    pub fn en_us() -> Self {
        Self {
            prefix: String::new(),
            suffix: "ago".to_string(),
            future_prefix: "in".to_string(),
            future_suffix: String::new(),
            now: "just now".to_string(),
            millisecond: UnitTerms::new("millisecond", "milliseconds"),
            second: UnitTerms::new("second", "seconds"),
            minute: UnitTerms::new("minute", "minutes"),
            hour: UnitTerms::new("hour", "hours"),
            day: UnitTerms::new("day", "days"),
            week: UnitTerms::new("week", "weeks"),
            month: UnitTerms::new("month", "months"),
            year: UnitTerms::new("year", "years"),
        }
    }

    /// Terms for the given unit.
    pub fn terms(&self, unit: TimeUnit) -> &UnitTerms {
        match unit {
            TimeUnit::Millisecond => &self.millisecond,
            TimeUnit::Second => &self.second,
            TimeUnit::Minute => &self.minute,
            TimeUnit::Hour => &self.hour,
            TimeUnit::Day => &self.day,
            TimeUnit::Week => &self.week,
            TimeUnit::Month => &self.month,
            TimeUnit::Year => &self.year,
        }
    }
}

fn builtin_default() -> &'static LanguagePack {
    static EN_US: OnceLock<LanguagePack> = OnceLock::new();
    EN_US.get_or_init(LanguagePack::en_us)
}

// ============================================
// Language Table
// ============================================

/// Registry of language packs keyed by language code.
///
/// Packs can be registered or overwritten at any time but never removed, so
/// [`DEFAULT_LANGUAGE`] stays resolvable.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    packs: HashMap<String, LanguagePack>,
}

impl LanguageTable {
    /// Create a table holding the built-in packs.
    pub fn new() -> Self {
        let mut packs = HashMap::new();
        packs.insert(DEFAULT_LANGUAGE.to_string(), LanguagePack::en_us());
        Self { packs }
    }

    /// Register a pack, replacing any pack already stored under `code`.
    ///
    /// Returns the replaced pack, if any.
    pub fn register(
        &mut self,
        code: impl Into<String>,
        pack: LanguagePack,
    ) -> Option<LanguagePack> {
        let code = code.into();
        tracing::info!(language = %code, "Registered language pack");
        self.packs.insert(code, pack)
    }

    pub fn get(&self, code: &str) -> Option<&LanguagePack> {
        self.packs.get(code)
    }

    /// The stored code and pack for `code`.
    pub fn entry(&self, code: &str) -> Option<(&str, &LanguagePack)> {
        self.packs
            .get_key_value(code)
            .map(|(code, pack)| (code.as_str(), pack))
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut LanguagePack> {
        self.packs.get_mut(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.packs.contains_key(code)
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.packs.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// The pack stored under [`DEFAULT_LANGUAGE`].
    pub fn default_pack(&self) -> &LanguagePack {
        self.packs
            .get(DEFAULT_LANGUAGE)
            .unwrap_or_else(|| builtin_default())
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================
// Resolution
// ============================================

/// Where a resolved language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    Config,
    Ambient,
    Default,
}

/// Outcome of language resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLanguage<'a> {
    pub code: &'a str,
    pub pack: &'a LanguagePack,
    pub source: LanguageSource,
}

/// Look up a candidate code, treating empty and unregistered codes as absent.
fn lookup<'t>(table: &'t LanguageTable, code: &str) -> Option<(&'t str, &'t LanguagePack)> {
    if code.is_empty() {
        return None;
    }
    match table.entry(code) {
        Some(entry) => Some(entry),
        None => {
            tracing::debug!(language = code, "Skipping unregistered language code");
            None
        }
    }
}

/// Resolve the active language pack.
pub fn resolve<'t>(
    configured: Option<&str>,
    ambient: Option<&str>,
    table: &'t LanguageTable,
) -> ResolvedLanguage<'t> {
    if let Some((code, pack)) = configured.and_then(|code| lookup(table, code)) {
        return ResolvedLanguage {
            code,
            pack,
            source: LanguageSource::Config,
        };
    }

    if let Some((code, pack)) = ambient.and_then(|code| lookup(table, code)) {
        return ResolvedLanguage {
            code,
            pack,
            source: LanguageSource::Ambient,
        };
    }

    ResolvedLanguage {
        code: DEFAULT_LANGUAGE,
        pack: table.default_pack(),
        source: LanguageSource::Default,
    }
}

// ============================================
// Ambient Language
// ============================================

/// Capability supplying a language code from the runtime environment.
///
/// Queried on every formatting call, so the answer may change between calls.
pub trait AmbientLanguage: Send + Sync {
    fn language_code(&self) -> Option<String>;
}

impl<F> AmbientLanguage for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn language_code(&self) -> Option<String> {
        self()
    }
}

/// Ambient provider that never supplies a code.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAmbientLanguage;

impl AmbientLanguage for NoAmbientLanguage {
    fn language_code(&self) -> Option<String> {
        None
    }
}

/// Ambient provider backed by the POSIX locale environment variables.
///
/// Checks `LC_ALL`, `LC_MESSAGES` and `LANG` in that order and normalizes
/// the first non-empty value into a table code (`en-US.UTF-8` -> `en_US`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLanguage;

impl EnvLanguage {
    const VARS: [&'static str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];
}

impl AmbientLanguage for EnvLanguage {
    fn language_code(&self) -> Option<String> {
        Self::VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .and_then(|value| normalize_locale(&value))
    }
}

/// Normalize a locale tag into the `ll_CC` form used as table keys.
///
/// Strips the codeset (`.UTF-8`) and modifier (`@euro`) and turns `-` into `_`.
pub fn normalize_locale(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let tag = tag.split(['.', '@']).next().unwrap_or(tag);
    if tag.is_empty() {
        return None;
    }
    Some(tag.replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_with_day(day: &str) -> LanguagePack {
        let mut pack = LanguagePack::en_us();
        pack.day = UnitTerms::new(day, day);
        pack
    }

    #[test]
    fn test_default_table_has_en_us() {
        let table = LanguageTable::new();
        assert!(table.contains(DEFAULT_LANGUAGE));
        assert_eq!(table.codes(), vec!["en_US"]);
        assert_eq!(table.default_pack().suffix, "ago");
    }

    #[test]
    fn test_register_overwrites() {
        let mut table = LanguageTable::new();
        assert!(table.register("FAKE", pack_with_day("one")).is_none());
        let replaced = table.register("FAKE", pack_with_day("two"));
        assert_eq!(replaced.map(|p| p.day.singular), Some("one".to_string()));
        assert_eq!(table.get("FAKE").map(|p| p.day.singular.as_str()), Some("two"));
    }

    #[test]
    fn test_unit_terms_for_count() {
        let terms = UnitTerms::new("day", "days");
        assert_eq!(terms.for_count(1), "day");
        assert_eq!(terms.for_count(0), "days");
        assert_eq!(terms.for_count(2), "days");
    }

    #[test]
    fn test_resolve_priority() {
        let mut table = LanguageTable::new();
        table.register("DOM", pack_with_day("DOM"));
        table.register("CONF", pack_with_day("CONF"));

        let resolved = resolve(Some("CONF"), Some("DOM"), &table);
        assert_eq!(resolved.code, "CONF");
        assert_eq!(resolved.source, LanguageSource::Config);

        let resolved = resolve(None, Some("DOM"), &table);
        assert_eq!(resolved.code, "DOM");
        assert_eq!(resolved.source, LanguageSource::Ambient);

        let resolved = resolve(None, None, &table);
        assert_eq!(resolved.code, DEFAULT_LANGUAGE);
        assert_eq!(resolved.source, LanguageSource::Default);
    }

    #[test]
    fn test_resolve_skips_unknown_and_empty_codes() {
        let mut table = LanguageTable::new();
        table.register("DOM", pack_with_day("DOM"));

        let resolved = resolve(Some("Garbage1"), Some("DOM"), &table);
        assert_eq!(resolved.source, LanguageSource::Ambient);

        let resolved = resolve(Some(""), Some("Garbage2"), &table);
        assert_eq!(resolved.source, LanguageSource::Default);
        assert_eq!(resolved.pack.day.singular, "day");
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en_US.UTF-8").as_deref(), Some("en_US"));
        assert_eq!(normalize_locale("de-DE").as_deref(), Some("de_DE"));
        assert_eq!(normalize_locale("fr_FR@euro").as_deref(), Some("fr_FR"));
        assert_eq!(normalize_locale(".UTF-8"), None);
        assert_eq!(normalize_locale("  "), None);
    }

    #[test]
    fn test_closure_ambient_provider() {
        let provider = || Some("FAKE".to_string());
        assert_eq!(provider.language_code().as_deref(), Some("FAKE"));
        assert_eq!(NoAmbientLanguage.language_code(), None);
    }

    #[test]
    fn test_incomplete_pack_fails_to_deserialize() {
        let toml = r#"
prefix = ""
suffix = "ago"
future_prefix = "in"
future_suffix = ""
now = "now"

[day]
singular = "wassup"
plural = "wassups"
"#;
        assert!(toml::from_str::<LanguagePack>(toml).is_err());
    }
}
