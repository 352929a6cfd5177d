//! # contextual-date-core
//!
//! Core library for contextual-date: turns timestamps into text a person can
//! read at a glance.
//!
//! This library provides:
//! - Input normalization for instants, epoch milliseconds and date strings
//! - Relative phrases ("3 days ago", "in 5 days", "just now") with
//!   configurable unit thresholds
//! - Absolute phrases picked by calendar distance (today, this month, ...)
//! - Language packs with runtime registration and layered resolution
//! - A bounded-staleness cache of "now" with explicit invalidation
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust
//! use contextual_date_core::{Config, ContextualDate};
//!
//! let mut engine = ContextualDate::new(Config::default());
//! engine.config_mut().hide_full_date = true;
//!
//! let text = engine.format("2024-06-12T12:00:00Z", None);
//! assert!(text.ends_with("ago"));
//! ```

// Re-export commonly used items at the crate root
pub use absolute::{AbsoluteFormatter, FullDateCategory, FullDateFormats};
pub use clock::{Clock, ManualClock, NowCache, SystemClock};
pub use config::Config;
pub use engine::ContextualDate;
pub use error::{Error, Result};
pub use language::{
    AmbientLanguage, EnvLanguage, LanguagePack, LanguageSource, LanguageTable, NoAmbientLanguage,
    ResolvedLanguage, UnitTerms, DEFAULT_LANGUAGE,
};
pub use parse::{parse_date, DateInput};
pub use pattern::PatternFormatter;
pub use relative::Thresholds;
pub use types::*;

// Public modules
pub mod absolute;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod logging;
pub mod parse;
pub mod pattern;
pub mod relative;
pub mod types;
