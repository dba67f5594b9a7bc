//! Report pages and the router that picks one per path.
//!
//! Each page declares the resources it needs and a pure builder from
//! [`PageData`] to [`PageView`]. Builders are called again whenever a resource
//! arrives, so a page fills in section by section.

use crate::data::{PageData, Resource};
use crate::domain::FeatureImportanceOptions;
use crate::report::{Block, PageView};

pub mod eda;
pub mod hypothesis;
pub mod intro;
pub mod missingness;
pub mod modeling;

pub const SITE_TITLE: &str = "Bot or Top?";
pub const SITE_SUBTITLE: &str = "Quantifying the Value of Jungle Gank Priority";
pub const SITE_TAGLINE: &str =
    "DSC 80 Final Project – Analyzing cross-map trade value in professional League of Legends";

/// One report page per path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Introduction,
    Eda,
    Missingness,
    Hypothesis,
    Modeling,
}

impl Route {
    /// Navigation order.
    pub const ALL: [Route; 5] = [
        Route::Introduction,
        Route::Eda,
        Route::Missingness,
        Route::Hypothesis,
        Route::Modeling,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Introduction => "/",
            Route::Eda => "/eda",
            Route::Missingness => "/missingness",
            Route::Hypothesis => "/hypothesis",
            Route::Modeling => "/modeling",
        }
    }

    /// Label in the navigation bar.
    pub fn nav_label(self) -> &'static str {
        match self {
            Route::Introduction => "Introduction",
            Route::Eda => "Cleaning & EDA",
            Route::Missingness => "Assessment of Missingness",
            Route::Hypothesis => "Hypothesis Testing",
            Route::Modeling => "Modeling & Fairness",
        }
    }

    /// Exact match on the known paths; a trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        let normalized = if normalized.is_empty() { "/" } else { normalized };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }

    pub fn index(self) -> usize {
        Route::ALL.iter().position(|&r| r == self).unwrap_or(0)
    }

    pub fn next(self) -> Route {
        Route::ALL[(self.index() + 1) % Route::ALL.len()]
    }

    pub fn prev(self) -> Route {
        Route::ALL[(self.index() + Route::ALL.len() - 1) % Route::ALL.len()]
    }

    /// Everything the page fetches when shown.
    pub fn resources(self) -> &'static [Resource] {
        match self {
            Route::Introduction => &[],
            Route::Eda => eda::RESOURCES,
            Route::Missingness => missingness::RESOURCES,
            Route::Hypothesis => hypothesis::RESOURCES,
            Route::Modeling => modeling::RESOURCES,
        }
    }

    /// The resource that gates the page's first render.
    pub fn primary(self) -> Option<Resource> {
        match self {
            Route::Introduction => None,
            Route::Eda => Some(Resource::SummaryStats),
            Route::Missingness => Some(Resource::MissingnessResults),
            Route::Hypothesis => Some(Resource::HypothesisTests),
            Route::Modeling => Some(Resource::ModelResults),
        }
    }

    pub fn build(self, data: &PageData, importance: FeatureImportanceOptions) -> PageView {
        match self {
            Route::Introduction => intro::build(),
            Route::Eda => eda::build(data),
            Route::Missingness => missingness::build(data),
            Route::Hypothesis => hypothesis::build(data),
            Route::Modeling => modeling::build(data, importance),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Chart block for `resource`, if it has loaded.
fn chart_block(data: &PageData, resource: Resource, caption: Option<&str>) -> Option<Block> {
    data.chart(resource).map(|figure| Block::Chart {
        caption: caption.map(str::to_string),
        figure: figure.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips_through_its_path() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/eda/"), Some(Route::Eda));
        assert_eq!(Route::from_path(""), Some(Route::Introduction));
        assert_eq!(Route::from_path("/troll"), None);
        assert_eq!(Route::from_path("/EDA"), None);
    }

    #[test]
    fn navigation_wraps() {
        assert_eq!(Route::Modeling.next(), Route::Introduction);
        assert_eq!(Route::Introduction.prev(), Route::Modeling);
        assert_eq!(Route::Eda.next(), Route::Missingness);
    }

    #[test]
    fn primary_resource_is_fetched() {
        for route in Route::ALL {
            if let Some(primary) = route.primary() {
                assert!(route.resources().contains(&primary), "{route}");
            }
        }
        assert!(Route::Introduction.resources().is_empty());
    }
}
