//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - validates the date filter
//! - runs the fetch-and-merge cycle
//! - prints the summary / launches the TUI
//! - writes optional exports

use chrono::{Days, Months, Utc};
use clap::Parser;

use crate::cli::{Command, FetchArgs};
use crate::data::DemandClient;
use crate::domain::{DateRange, FetchConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `kwh` binary.
pub fn run() -> Result<(), AppError> {
    // We want `kwh` and `kwh --offline` to behave like `kwh tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    init_tracing();

    let config = fetch_config_from_args(&args)?;
    let client = client_from_args(&args);
    let out = pipeline::run_cycle(&client, &config)?;

    print!("{}", crate::report::format_cycle_summary(&out, &config));

    if let Some(path) = &config.export {
        crate::io::export::write_points_csv(path, &out.points)?;
        println!("Exported {} points to {}", out.points.len(), path.display());
    }

    Ok(())
}

/// Build the API client, honoring the `--api-url` override.
pub fn client_from_args(args: &FetchArgs) -> DemandClient {
    match &args.api_url {
        Some(url) => DemandClient::new(url.clone()),
        None => DemandClient::from_env(),
    }
}

/// Resolve CLI flags into a validated run configuration.
///
/// Omitted dates fall back to the dashboard defaults: the window starts three
/// months back and ends fourteen days ahead, so the chart shows recent
/// history plus the forecast horizon.
pub fn fetch_config_from_args(args: &FetchArgs) -> Result<FetchConfig, AppError> {
    let (default_start, default_end) = default_window();

    let start = args.start.clone().unwrap_or(default_start);
    let end = args.end.clone().unwrap_or(default_end);
    let range = DateRange::parse(&start, &end)?;

    Ok(FetchConfig {
        range,
        forecast_limit: args.limit,
        offline: args.offline,
        sample_seed: args.seed,
        export: args.export.clone(),
    })
}

/// Default filter window as `YYYY-MM-DD` strings.
pub fn default_window() -> (String, String) {
    let today = Utc::now().date_naive();
    let start = today.checked_sub_months(Months::new(3)).unwrap_or(today);
    let end = today.checked_add_days(Days::new(14)).unwrap_or(today);
    (start.to_string(), end.to_string())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // Stderr keeps the summary on stdout pipeable. The TUI skips this
    // entirely so log lines never hit the alternate screen.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Rewrite argv so `kwh` defaults to `kwh tui`.
///
/// Rules:
/// - `kwh`                      -> `kwh tui`
/// - `kwh --offline ...`        -> `kwh tui --offline ...`
/// - `kwh --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fetch" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(start: Option<&str>, end: Option<&str>) -> FetchArgs {
        FetchArgs {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
            api_url: None,
            limit: 500,
            offline: true,
            seed: 42,
            export: None,
        }
    }

    #[test]
    fn explicit_window_is_used() {
        let config = fetch_config_from_args(&args(Some("2025-01-01"), Some("2025-01-31"))).unwrap();
        assert_eq!(config.range.start().to_string(), "2025-01-01");
        assert_eq!(config.range.end().to_string(), "2025-01-31");
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(fetch_config_from_args(&args(Some("2025-02-01"), Some("2025-01-01"))).is_err());
    }

    #[test]
    fn default_window_is_valid() {
        let config = fetch_config_from_args(&args(None, None)).unwrap();
        assert!(config.range.start() < config.range.end());
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        let argv = rewrite_args(vec!["kwh".to_string()]);
        assert_eq!(argv, vec!["kwh", "tui"]);

        let argv = rewrite_args(vec!["kwh".to_string(), "--offline".to_string()]);
        assert_eq!(argv, vec!["kwh", "tui", "--offline"]);

        let argv = rewrite_args(vec!["kwh".to_string(), "fetch".to_string()]);
        assert_eq!(argv, vec!["kwh", "fetch"]);

        let argv = rewrite_args(vec!["kwh".to_string(), "--help".to_string()]);
        assert_eq!(argv, vec!["kwh", "--help"]);
    }
}
