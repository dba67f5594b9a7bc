//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data location
//! - sets up logging
//! - dispatches to the TUI or a text command

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, DataArgs, ExportArgs, RenderArgs, TuiArgs};
use crate::data::Fetcher;
use crate::domain::{DataLocation, FeatureImportanceOptions, ReportConfig};
use crate::error::AppError;
use crate::pages::Route;

pub mod pipeline;

/// Environment variable naming the data location.
pub const DATA_ENV: &str = "BOT_OR_TOP_DATA";
/// Data location when neither `--data` nor the environment set one.
pub const DEFAULT_DATA_DIR: &str = "data";

const DEFAULT_LOG_FILTER: &str = "bot_or_top=info";

/// Entry point for the `bot-or-top` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Render(args) => handle_render(args),
        Command::Export(args) => handle_export(args),
        Command::Pages => {
            for route in Route::ALL {
                println!("{:<14} {}", route.path(), route.nav_label());
            }
            Ok(())
        }
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let route = parse_route(&args.route)?;
    init_file_logging(&args.log_file)?;
    let config = report_config(&args.data, args.importance.options());
    let fetcher = open_fetcher(&config)?;
    crate::tui::run(
        fetcher,
        crate::tui::TuiOptions {
            route,
            data: config.data,
            importance: config.importance,
            ascii_charts: args.ascii_charts,
        },
    )
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let route = parse_route(&args.route)?;
    init_stderr_logging();
    let config = report_config(&args.data, args.importance.options());
    let fetcher = open_fetcher(&config)?;
    print!(
        "{}",
        pipeline::render_route(&fetcher, route, config.importance, args.width)
    );
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    init_stderr_logging();
    let config = report_config(&args.data, args.importance.options());
    let fetcher = open_fetcher(&config)?;
    let path = crate::export::write_report(&fetcher, &config, &args.out, args.width)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn open_fetcher(config: &ReportConfig) -> Result<Fetcher, AppError> {
    let source = crate::data::source::open(&config.data)?;
    tracing::info!(data = %source.describe(), "data source ready");
    Fetcher::new(source)
}

/// `--data` wins over the environment, which wins over the default.
pub fn resolve_data_location(flag: Option<&str>, env: Option<&str>) -> DataLocation {
    let raw = flag
        .or(env)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DATA_DIR);
    DataLocation::parse(raw)
}

fn report_config(data: &DataArgs, importance: FeatureImportanceOptions) -> ReportConfig {
    let env = std::env::var(DATA_ENV).ok();
    ReportConfig {
        data: resolve_data_location(data.data.as_deref(), env.as_deref()),
        importance,
    }
}

fn parse_route(raw: &str) -> Result<Route, AppError> {
    Route::from_path(raw).ok_or_else(|| {
        let known: Vec<&str> = Route::ALL.iter().map(|r| r.path()).collect();
        AppError::usage(format!(
            "Unknown page '{raw}'. Known pages: {}",
            known.join(", ")
        ))
    })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The TUI owns the terminal, so its logs go to a file.
fn init_file_logging(path: &Path) -> Result<(), AppError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            AppError::usage(format!("Failed to open log file {}: {e}", path.display()))
        })?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Rewrite argv so `bot-or-top` defaults to `bot-or-top tui`.
///
/// Rules:
/// - `bot-or-top`                      -> `bot-or-top tui`
/// - `bot-or-top --route /eda ...`     -> `bot-or-top tui --route /eda ...`
/// - `bot-or-top --help/--version/-h`  -> unchanged (show top-level help/version)
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

    let is_subcommand = matches!(arg1.as_str(), "tui" | "render" | "export" | "pages");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_and_flags_default_to_tui() {
        assert_eq!(rewrite_args(argv(&["bot-or-top"])), argv(&["bot-or-top", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["bot-or-top", "--route", "/eda"])),
            argv(&["bot-or-top", "tui", "--route", "/eda"])
        );
        assert_eq!(
            rewrite_args(argv(&["bot-or-top", "render", "/"])),
            argv(&["bot-or-top", "render", "/"])
        );
        assert_eq!(
            rewrite_args(argv(&["bot-or-top", "--help"])),
            argv(&["bot-or-top", "--help"])
        );
    }

    #[test]
    fn data_flag_beats_env_beats_default() {
        assert_eq!(
            resolve_data_location(Some("https://example.org/data"), Some("env/dir")),
            DataLocation::Http("https://example.org/data/".to_string())
        );
        assert_eq!(
            resolve_data_location(None, Some("env/dir")),
            DataLocation::parse("env/dir")
        );
        assert_eq!(
            resolve_data_location(None, Some("  ")),
            DataLocation::parse(DEFAULT_DATA_DIR)
        );
        assert_eq!(resolve_data_location(None, None), DataLocation::parse("data"));
    }

    #[test]
    fn unknown_route_is_a_usage_error() {
        let err = parse_route("/troll").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
        assert!(err.to_string().contains("/missingness"));
        assert_eq!(parse_route("/eda/").unwrap(), Route::Eda);
    }
}
