//! contextual-date - render timestamps as contextual text
//!
//! Prints one line per input date, e.g. `June 12 at 12:00 PM (3 days ago)`.
//! Inputs that are not dates are echoed back unchanged.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use contextual_date_core::{logging, Config, ContextualDate, DateInput, EnvLanguage};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contextual-date")]
#[command(about = "Render timestamps as relative and absolute contextual text")]
#[command(version)]
struct Args {
    /// Dates to format: RFC 3339, RFC 2822, or epoch milliseconds
    #[arg(required_unless_present = "list_languages", allow_hyphen_values = true)]
    dates: Vec<String>,

    /// Print the registered language codes and exit
    #[arg(long)]
    list_languages: bool,

    /// Reference instant to describe dates against (default: now)
    #[arg(long)]
    now: Option<String>,

    /// Which phrase to print
    #[arg(short, long, value_enum, default_value_t = Mode::Combined)]
    mode: Mode,

    /// Text used in place of the computed absolute phrase
    #[arg(long = "override")]
    full_override: Option<String>,

    /// Language code (overrides config and environment)
    #[arg(short, long)]
    language: Option<String>,

    /// Print only the relative phrase in combined mode
    #[arg(long)]
    hide_full_date: bool,

    /// Config file (default: $XDG_CONFIG_HOME/contextual-date/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Log at debug level and report the log directory on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Absolute and relative phrases through the configured template
    Combined,
    /// Relative phrase only ("3 days ago")
    Relative,
    /// Absolute phrase only ("June 12")
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct Rendered {
    input: String,
    parsed: Option<DateTime<Utc>>,
    text: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    if args.verbose {
        config.logging.level = "debug".to_string();
    }
    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => {
            if args.verbose {
                eprintln!("logging to {}", guard.log_dir().display());
            }
            Some(guard)
        }
        Err(e) => {
            if args.verbose {
                eprintln!("logging disabled: {}", e);
            }
            None
        }
    };

    if let Some(language) = &args.language {
        config.language = Some(language.clone());
    }
    if args.hide_full_date {
        config.hide_full_date = true;
    }

    let engine = ContextualDate::new(config).with_ambient_language(EnvLanguage);

    if args.list_languages {
        return list_languages(&engine, args.output);
    }

    let reference = match &args.now {
        Some(now) => Some(
            engine
                .parse_date(now.as_str())
                .with_context(|| format!("invalid --now value: {}", now))?,
        ),
        None => None,
    };

    tracing::debug!(
        dates = args.dates.len(),
        mode = ?args.mode,
        language = engine.resolve_language().code,
        "Formatting dates"
    );

    let rendered: Vec<Rendered> = args
        .dates
        .iter()
        .map(|date| render(&engine, date, reference, &args))
        .collect();

    match args.output {
        Output::Text => {
            for row in &rendered {
                println!("{}", row.text);
            }
        }
        Output::Json => {
            let json =
                serde_json::to_string_pretty(&rendered).context("failed to serialize output")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn list_languages(engine: &ContextualDate, output: Output) -> Result<()> {
    let codes = engine.languages().codes();
    match output {
        Output::Text => {
            let active = engine.resolve_language().code;
            for code in codes {
                let marker = if code == active { "*" } else { " " };
                println!("{} {}", marker, code);
            }
        }
        Output::Json => {
            let json = serde_json::to_string_pretty(&codes).context("failed to serialize output")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn render(
    engine: &ContextualDate,
    date: &str,
    reference: Option<DateTime<Utc>>,
    args: &Args,
) -> Rendered {
    let parsed = engine.parse_date(date).ok();
    let input = match parsed {
        Some(instant) => DateInput::Instant(instant),
        None => DateInput::from(date),
    };

    let text = match args.mode {
        Mode::Combined => engine.format_at(input, reference, args.full_override.as_deref()),
        Mode::Relative => engine.format_relative(input, reference),
        Mode::Full => engine.format_full(input, reference),
    };

    Rendered {
        input: date.to_string(),
        parsed,
        text,
    }
}
