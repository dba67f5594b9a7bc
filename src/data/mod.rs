//! Loading the report's JSON artifacts.
//!
//! - `resource`: the fixed artifact catalogue and typed decoding
//! - `source`: HTTP / directory byte sources
//! - `loader`: per-page concurrent loading and resource states

use std::path::PathBuf;

pub mod loader;
pub mod resource;
pub mod source;

pub use loader::{Fetcher, PageData, PageLoader, ResourceState};
pub use resource::{Document, Resource};
pub use source::{DataSource, DirSource, HttpSource};

/// Why a resource could not be loaded.
///
/// Pages do not distinguish these: any of them leaves the section absent. The
/// variants exist for the log line.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {message}")]
    Url { url: String, message: String },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
