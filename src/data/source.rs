//! Where artifact bytes come from: a static HTTP location or a directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::domain::DataLocation;
use crate::error::AppError;

use super::FetchError;

/// Plain byte fetch of one artifact by file name.
///
/// Implementations must be shareable across the fetch pool's threads.
pub trait DataSource: Send + Sync {
    fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError>;

    /// Human-readable location, for the header and logs.
    fn describe(&self) -> String;
}

/// `GET <base><file_name>` with no query, body, or auth.
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self, AppError> {
        let base = Url::parse(base)
            .map_err(|e| AppError::usage(format!("Invalid data URL '{base}': {e}")))?;
        // No request timeout: a fetch that never resolves leaves its resource
        // loading rather than failing it.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, base })
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError> {
        let url = self
            .base
            .join(file_name)
            .map_err(|e| FetchError::Url {
                url: format!("{}{file_name}", self.base),
                message: e.to_string(),
            })?;

        let resp = self.client.get(url.clone()).send().map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }

        let bytes = resp.bytes().map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Reads artifacts from a local directory (e.g. the frontend's `public/data`).
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if !root.is_dir() {
            tracing::warn!(dir = %root.display(), "data directory does not exist; every fetch will fail");
        }
        Self { root }
    }
}

impl DataSource for DirSource {
    fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.root.join(file_name);
        std::fs::read(&path).map_err(|source| FetchError::Io { path, source })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Build the source for a configured location.
pub fn open(location: &DataLocation) -> Result<Arc<dyn DataSource>, AppError> {
    Ok(match location {
        DataLocation::Http(base) => Arc::new(HttpSource::new(base)?),
        DataLocation::Dir(dir) => Arc::new(DirSource::new(dir.clone())),
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    use super::*;

    /// Accept one connection, read the request head, answer with `response`.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 512];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/data/")
    }

    #[test]
    fn http_source_returns_body_on_success() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        );
        let source = HttpSource::new(&base).unwrap();
        assert_eq!(source.fetch("summary_stats.json").unwrap(), b"{}");
    }

    #[test]
    fn http_source_reports_non_success_status() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let source = HttpSource::new(&base).unwrap();
        match source.fetch("model_results.json").unwrap_err() {
            FetchError::Status { url, status } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert!(url.ends_with("/data/model_results.json"), "{url}");
            }
            other => panic!("expected a status error, got {other}"),
        }
    }

    #[test]
    fn http_fetch_without_reply_stays_pending() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (hold_tx, hold_rx) = mpsc::channel::<()>();
        std::thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            // Keep the connection open, silent, until the test ends.
            let _ = hold_rx.recv();
        });

        let source = HttpSource::new(&format!("http://{addr}/data/")).unwrap();
        let (done_tx, done_rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = done_tx.send(source.fetch("summary_stats.json").is_ok());
        });

        assert_eq!(
            done_rx.recv_timeout(Duration::from_secs(2)),
            Err(mpsc::RecvTimeoutError::Timeout)
        );
        drop(hold_tx);
    }

    #[test]
    fn dir_source_reads_and_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summary_stats.json"), b"{}").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.fetch("summary_stats.json").unwrap(), b"{}");
        let err = source.fetch("model_results.json").unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn http_source_rejects_bad_base() {
        let err = HttpSource::new("not a url").err().unwrap();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn open_picks_source_by_location() {
        let source = open(&DataLocation::parse("https://example.org/leagueresearch/data")).unwrap();
        assert_eq!(source.describe(), "https://example.org/leagueresearch/data/");

        let source = open(&DataLocation::parse("public/data")).unwrap();
        assert_eq!(source.describe(), "public/data");
    }
}
