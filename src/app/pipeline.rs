//! Shared "load and build a page" logic used by the `render` and `export`
//! commands.
//!
//! The TUI loads incrementally through `PageLoader`; these commands instead
//! wait for every resource of a page and then render once.

use crate::data::{Fetcher, PageData};
use crate::domain::FeatureImportanceOptions;
use crate::pages::Route;
use crate::report::PageView;
use crate::report::text::render_page;

/// A page built from fully settled data.
#[derive(Debug, Clone)]
pub struct BuiltPage {
    pub route: Route,
    pub view: PageView,
    pub data: PageData,
}

/// Load every resource of `route` concurrently, then build its view.
pub fn build_page(fetcher: &Fetcher, route: Route, importance: FeatureImportanceOptions) -> BuiltPage {
    let data = fetcher.load_all(route.resources());
    let failed = data.failed();
    if !failed.is_empty() {
        tracing::warn!(%route, failed = failed.len(), "page rendered with missing resources");
    }
    let view = route.build(&data, importance);
    BuiltPage { route, view, data }
}

/// Markdown for one page.
pub fn render_route(
    fetcher: &Fetcher,
    route: Route,
    importance: FeatureImportanceOptions,
    chart_width: usize,
) -> String {
    render_page(&build_page(fetcher, route, importance).view, chart_width)
}
