//! Markdown export of the whole report.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::build_page;
use crate::data::Fetcher;
use crate::domain::ReportConfig;
use crate::error::AppError;
use crate::pages::{Route, SITE_SUBTITLE, SITE_TAGLINE, SITE_TITLE};
use crate::report::text::render_page;

/// Write every page, in navigation order, to `<dir>/report_<timestamp>.md`.
pub fn write_report(
    fetcher: &Fetcher,
    config: &ReportConfig,
    dir: &Path,
    chart_width: usize,
) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::runtime(format!("Failed to create export dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("report_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::runtime(format!("Failed to create export file: {e}")))?;
    let write_err = |e: std::io::Error| AppError::runtime(format!("Failed to write export: {e}"));

    writeln!(file, "# {SITE_TITLE} {SITE_SUBTITLE}").map_err(write_err)?;
    writeln!(file, "\n{SITE_TAGLINE}\n").map_err(write_err)?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339()).map_err(write_err)?;
    writeln!(file, "- data: {}", config.data.describe()).map_err(write_err)?;

    let mut missing = 0usize;
    for route in Route::ALL {
        let page = build_page(fetcher, route, config.importance);
        missing += page.data.failed().len();
        writeln!(file).map_err(write_err)?;
        write!(file, "{}", render_page(&page.view, chart_width)).map_err(write_err)?;
    }

    tracing::info!(path = %path.display(), missing, "report exported");
    Ok(path)
}
