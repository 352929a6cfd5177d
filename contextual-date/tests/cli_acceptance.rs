use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const NOW: &str = "2024-06-15T12:00:00Z";

const SPANISH_PACK: &str = r#"
[languages.es_ES]
prefix = "hace"
suffix = ""
future_prefix = "en"
future_suffix = ""
now = "ahora"

[languages.es_ES.millisecond]
singular = "milisegundo"
plural = "milisegundos"

[languages.es_ES.second]
singular = "segundo"
plural = "segundos"

[languages.es_ES.minute]
singular = "minuto"
plural = "minutos"

[languages.es_ES.hour]
singular = "hora"
plural = "horas"

[languages.es_ES.day]
singular = "día"
plural = "días"

[languages.es_ES.week]
singular = "semana"
plural = "semanas"

[languages.es_ES.month]
singular = "mes"
plural = "meses"

[languages.es_ES.year]
singular = "año"
plural = "años"
"#;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn config_path(&self) -> PathBuf {
        self.xdg_config.join("contextual-date/config.toml")
    }

    fn write_config(&self, content: &str) {
        write_file(&self.config_path(), content);
    }
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("missing config parent"))
        .expect("failed to create config directory");
    fs::write(path, content).expect("failed to write config");
}

fn run_cli(env: &CliTestEnv, args: &[&str], lang: Option<&str>) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("contextual-date"));
    let mut command = Command::new(bin_path);

    command
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("LC_ALL")
        .env_remove("LC_MESSAGES")
        .env_remove("RUST_LOG");

    match lang {
        Some(lang) => command.env("LANG", lang),
        None => command.env_remove("LANG"),
    };

    command
        .output()
        .unwrap_or_else(|e| panic!("failed to execute contextual-date: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "contextual-date {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        output.status,
        stdout,
        stderr
    );
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn relative_mode_prints_one_line_per_input() {
    let env = CliTestEnv::new();
    let args = [
        "--now",
        NOW,
        "--mode",
        "relative",
        "2024-06-12T12:00:00Z",
        "2024-06-20T12:00:00Z",
        "garbage",
    ];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(
        stdout_lines(&output),
        vec!["3 days ago", "in 5 days", "garbage"]
    );
}

#[test]
fn combined_mode_uses_template() {
    let env = CliTestEnv::new();
    let args = ["--now", NOW, "2024-06-12T12:00:00Z"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(
        stdout_lines(&output),
        vec!["June 12 at 12:00 PM (3 days ago)"]
    );
}

#[test]
fn override_replaces_absolute_phrase() {
    let env = CliTestEnv::new();
    let args = ["--now", NOW, "--override", "last week", "2024-06-12T12:00:00Z"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["last week (3 days ago)"]);
}

#[test]
fn hide_full_date_prints_relative_only() {
    let env = CliTestEnv::new();
    let args = ["--now", NOW, "--hide-full-date", "2024-06-12T12:00:00Z"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["3 days ago"]);
}

#[test]
fn full_mode_accepts_epoch_milliseconds() {
    let env = CliTestEnv::new();
    let args = ["--now", "1718452800000", "--mode", "full", "1718357400000"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["June 14 at 9:30 AM"]);
}

#[test]
fn json_output_reports_parsed_instants() {
    let env = CliTestEnv::new();
    let args = [
        "--now",
        NOW,
        "--mode",
        "relative",
        "--output",
        "json",
        "2024-06-15T11:00:00Z",
        "garbage",
    ];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);

    let rows: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let rows = rows.as_array().expect("expected a JSON array");
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["input"], "2024-06-15T11:00:00Z");
    assert_eq!(rows[0]["text"], "1 hour ago");
    assert!(rows[0]["parsed"].is_string());

    assert_eq!(rows[1]["input"], "garbage");
    assert_eq!(rows[1]["text"], "garbage");
    assert!(rows[1]["parsed"].is_null());
}

#[test]
fn config_file_registers_and_selects_language() {
    let env = CliTestEnv::new();
    env.write_config(&format!("language = \"es_ES\"\n{SPANISH_PACK}"));
    let args = ["--now", NOW, "--mode", "relative", "2024-06-12T12:00:00Z"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["hace 3 días"]);
}

#[test]
fn ambient_locale_selects_registered_language() {
    let env = CliTestEnv::new();
    env.write_config(SPANISH_PACK);
    let args = ["--now", NOW, "--mode", "relative", "2024-06-20T12:00:00Z"];

    let output = run_cli(&env, &args, Some("es_ES.UTF-8"));
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["en 5 días"]);

    // An explicit language wins over the environment
    let args = [
        "--now",
        NOW,
        "--mode",
        "relative",
        "--language",
        "en_US",
        "2024-06-20T12:00:00Z",
    ];
    let output = run_cli(&env, &args, Some("es_ES.UTF-8"));
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["in 5 days"]);
}

#[test]
fn unknown_language_falls_back_to_default() {
    let env = CliTestEnv::new();
    let args = [
        "--now",
        NOW,
        "--mode",
        "relative",
        "--language",
        "Garbage1",
        "2024-06-14T12:00:00Z",
    ];

    let output = run_cli(&env, &args, Some("Garbage2"));
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["1 day ago"]);
}

#[test]
fn explicit_config_path_is_used() {
    let env = CliTestEnv::new();
    let custom = env.home.join("custom.toml");
    write_file(&custom, "template = \"%relativeDate% | %fullDate%\"\n");
    let custom_arg = custom.to_string_lossy().into_owned();
    let args = ["--config", &custom_arg, "--now", NOW, "2024-06-12T12:00:00Z"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(
        stdout_lines(&output),
        vec!["3 days ago | June 12 at 12:00 PM"]
    );
}

#[test]
fn invalid_now_is_an_error() {
    let env = CliTestEnv::new();
    let output = run_cli(&env, &["--now", "not-a-date", "2024-06-12T12:00:00Z"], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid --now value"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn malformed_config_is_an_error() {
    let env = CliTestEnv::new();
    env.write_config("buffer_ms = \"soon\"\n");
    let output = run_cli(&env, &["--now", NOW, "2024-06-12T12:00:00Z"], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to load configuration"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn verbose_reports_log_directory() {
    let env = CliTestEnv::new();
    let args = ["-v", "--now", NOW, "--mode", "relative", "2024-06-12T12:00:00Z"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["3 days ago"]);

    let log_dir = env.xdg_state.join("contextual-date");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&format!("logging to {}", log_dir.display())),
        "unexpected stderr:\n{stderr}"
    );
    assert!(log_dir.is_dir());
}

#[test]
fn minute_precision_iso_input_is_formatted() {
    let env = CliTestEnv::new();
    let args = ["--now", NOW, "--mode", "relative", "2024-06-15T11:00Z", "2024-06"];

    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["1 hour ago", "2 weeks ago"]);
}

#[test]
fn list_languages_marks_active_code() {
    let env = CliTestEnv::new();
    env.write_config(SPANISH_PACK);
    let args = ["--list-languages"];

    let output = run_cli(&env, &args, Some("es_ES.UTF-8"));
    assert_success(&args, &output);
    assert_eq!(stdout_lines(&output), vec!["  en_US", "* es_ES"]);

    let args = ["--list-languages", "--output", "json"];
    let output = run_cli(&env, &args, None);
    assert_success(&args, &output);
    let codes: Vec<String> =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(codes, vec!["en_US", "es_ES"]);
}
