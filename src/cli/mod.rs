//! Command-line parsing for the report viewer.
//!
//! Argument parsing and dispatch stay separate from the page and data code;
//! `app` turns these structs into a `ReportConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::FeatureImportanceOptions;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "bot-or-top",
    version,
    about = "Bot or Top? Terminal viewer for the jungle gank priority report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the report interactively.
    Tui(TuiArgs),
    /// Print one page as Markdown text.
    Render(RenderArgs),
    /// Write every page into one timestamped Markdown file.
    Export(ExportArgs),
    /// List the report's pages.
    Pages,
}

/// Where to read the JSON artifacts from.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Base URL (`http(s)://...`) or local directory holding the JSON files.
    ///
    /// Overrides `BOT_OR_TOP_DATA`; defaults to `data`.
    #[arg(long, value_name = "BASE")]
    pub data: Option<String>,
}

/// How the feature-importance list on the modeling page is shown.
#[derive(Debug, Args, Clone, Default)]
pub struct ImportanceArgs {
    /// Keep the file order instead of sorting by importance.
    #[arg(long)]
    pub unsorted_importance: bool,

    /// Show at most N features.
    #[arg(long, value_name = "N", conflicts_with = "all_importances")]
    pub importance_limit: Option<usize>,

    /// Show every feature.
    #[arg(long)]
    pub all_importances: bool,
}

impl ImportanceArgs {
    pub fn options(&self) -> FeatureImportanceOptions {
        let defaults = FeatureImportanceOptions::default();
        let limit = if self.all_importances {
            None
        } else {
            self.importance_limit.or(defaults.limit)
        };
        FeatureImportanceOptions {
            sort_by_importance: !self.unsorted_importance,
            limit,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Page to open first.
    #[arg(long, default_value = "/", value_name = "PATH")]
    pub route: String,

    #[command(flatten)]
    pub data: DataArgs,

    /// Draw charts as character grids instead of Plotters canvases.
    #[arg(long)]
    pub ascii_charts: bool,

    #[command(flatten)]
    pub importance: ImportanceArgs,

    /// Log file (the terminal is owned by the UI).
    #[arg(long, default_value = "bot-or-top.log", value_name = "PATH")]
    pub log_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Page path, e.g. `/eda`.
    pub route: String,

    #[command(flatten)]
    pub data: DataArgs,

    /// Chart width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    #[command(flatten)]
    pub importance: ImportanceArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Output directory.
    #[arg(long, default_value = "exports", value_name = "DIR")]
    pub out: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,

    /// Chart width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    #[command(flatten)]
    pub importance: ImportanceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bot-or-top").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn importance_flags_map_to_options() {
        let Command::Render(args) = parse(&["render", "/modeling"]).command else {
            panic!("expected render");
        };
        assert_eq!(args.importance.options(), FeatureImportanceOptions::default());

        let Command::Render(args) =
            parse(&["render", "/modeling", "--unsorted-importance", "--all-importances"]).command
        else {
            panic!("expected render");
        };
        assert_eq!(
            args.importance.options(),
            FeatureImportanceOptions {
                sort_by_importance: false,
                limit: None
            }
        );

        let Command::Render(args) =
            parse(&["render", "/modeling", "--importance-limit", "3"]).command
        else {
            panic!("expected render");
        };
        assert_eq!(args.importance.options().limit, Some(3));
    }

    #[test]
    fn tui_defaults() {
        let Command::Tui(args) = parse(&["tui"]).command else {
            panic!("expected tui");
        };
        assert_eq!(args.route, "/");
        assert_eq!(args.log_file, PathBuf::from("bot-or-top.log"));
        assert!(args.data.data.is_none());
        assert!(!args.ascii_charts);
    }

    #[test]
    fn limit_conflicts_with_all() {
        let err = Cli::try_parse_from([
            "bot-or-top",
            "render",
            "/",
            "--importance-limit",
            "3",
            "--all-importances",
        ]);
        assert!(err.is_err());
    }
}
