//! Per-page resource loading.
//!
//! Every page load issues one fetch per resource, all at once, on a thread
//! pool owned by that load. Results come back over a channel that only the
//! owning [`PageLoader`] drains, so the UI thread applies them between input
//! polls and the page fills in as responses arrive.
//!
//! Dropping a `PageLoader` (navigating away) raises its cancel flag: queued
//! fetches are skipped and late responses are thrown away instead of landing
//! on a page that is no longer shown. Fetches already in flight cannot be
//! interrupted; they finish on the old load's threads, which exit afterwards,
//! so a hung request never holds a thread the next page needs.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};

use rayon::prelude::*;

use crate::chart::Figure;
use crate::domain::{HeadRow, HypothesisTests, MissingnessResults, ModelResults, PivotRow, SummaryStats};
use crate::error::AppError;

use super::{DataSource, Document, FetchError, Resource};

/// Upper bound on fetch threads per load. Above the largest page's resource
/// set, so within one load no fetch waits behind another.
pub const FETCH_THREADS: usize = 8;

/// `NotRequested → Loading → {Loaded | Failed}`; the last two are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState {
    NotRequested,
    Loading,
    Loaded(Document),
    Failed,
}

static NOT_REQUESTED: ResourceState = ResourceState::NotRequested;

/// Resource states for one page view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageData {
    states: BTreeMap<Resource, ResourceState>,
}

impl PageData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page data with every given document already loaded.
    pub fn loaded(documents: impl IntoIterator<Item = (Resource, Document)>) -> Self {
        let mut data = Self::new();
        for (resource, document) in documents {
            data.mark_loading(resource);
            data.resolve(resource, Ok(document));
        }
        data
    }

    pub fn state(&self, resource: Resource) -> &ResourceState {
        self.states.get(&resource).unwrap_or(&NOT_REQUESTED)
    }

    /// `NotRequested → Loading`. Other states are left alone.
    pub fn mark_loading(&mut self, resource: Resource) {
        let state = self.states.entry(resource).or_insert(ResourceState::NotRequested);
        if *state == ResourceState::NotRequested {
            *state = ResourceState::Loading;
        }
    }

    /// `Loading → Loaded | Failed`. Ignored in any other state.
    pub fn resolve(&mut self, resource: Resource, result: Result<Document, FetchError>) {
        let Some(state) = self.states.get_mut(&resource) else {
            return;
        };
        if *state != ResourceState::Loading {
            return;
        }
        *state = match result {
            Ok(document) => ResourceState::Loaded(document),
            Err(_) => ResourceState::Failed,
        };
    }

    /// True when nothing is still loading.
    pub fn is_settled(&self) -> bool {
        !self.states.values().any(|s| *s == ResourceState::Loading)
    }

    /// Resources whose fetch or decode failed.
    pub fn failed(&self) -> Vec<Resource> {
        self.states
            .iter()
            .filter(|(_, s)| **s == ResourceState::Failed)
            .map(|(&r, _)| r)
            .collect()
    }

    pub fn document(&self, resource: Resource) -> Option<&Document> {
        match self.state(resource) {
            ResourceState::Loaded(document) => Some(document),
            _ => None,
        }
    }

    pub fn summary_stats(&self) -> Option<&SummaryStats> {
        match self.document(Resource::SummaryStats)? {
            Document::SummaryStats(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn head_rows(&self) -> Option<&[HeadRow]> {
        match self.document(Resource::HeadData)? {
            Document::HeadData(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn pivot_rows(&self) -> Option<&[PivotRow]> {
        match self.document(Resource::PivotTable)? {
            Document::PivotTable(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn hypothesis_tests(&self) -> Option<&HypothesisTests> {
        match self.document(Resource::HypothesisTests)? {
            Document::HypothesisTests(tests) => Some(tests),
            _ => None,
        }
    }

    pub fn missingness(&self) -> Option<&MissingnessResults> {
        match self.document(Resource::MissingnessResults)? {
            Document::MissingnessResults(results) => Some(results),
            _ => None,
        }
    }

    pub fn model_results(&self) -> Option<&ModelResults> {
        match self.document(Resource::ModelResults)? {
            Document::ModelResults(results) => Some(results),
            _ => None,
        }
    }

    pub fn chart(&self, resource: Resource) -> Option<&Figure> {
        match self.document(resource)? {
            Document::Chart(figure) => Some(figure),
            _ => None,
        }
    }
}

/// Fetch and decode one resource, logging the outcome.
pub fn fetch_document(source: &dyn DataSource, resource: Resource) -> Result<Document, FetchError> {
    tracing::debug!(%resource, "fetching");
    let result = source
        .fetch(resource.file_name())
        .and_then(|bytes| resource.decode(&bytes));
    match &result {
        Ok(_) => tracing::info!(%resource, "loaded"),
        Err(error) => tracing::warn!(%resource, %error, "failed to load resource"),
    }
    result
}

/// Shared fetch machinery: a data source plus the thread budget per load.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn DataSource>,
    threads: usize,
    pool: Arc<rayon::ThreadPool>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn DataSource>) -> Result<Self, AppError> {
        Self::with_threads(source, FETCH_THREADS)
    }

    pub fn with_threads(source: Arc<dyn DataSource>, threads: usize) -> Result<Self, AppError> {
        let threads = threads.max(1);
        Ok(Self {
            source,
            threads,
            pool: Arc::new(fetch_pool(threads)?),
        })
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Start loading `resources` in the background on a pool of their own.
    pub fn load(&self, resources: &[Resource]) -> Result<PageLoader, AppError> {
        let pool = fetch_pool(resources.len().clamp(1, self.threads))?;
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let mut data = PageData::new();

        for &resource in resources {
            if *data.state(resource) != ResourceState::NotRequested {
                continue;
            }
            data.mark_loading(resource);

            let tx = tx.clone();
            let cancel = Arc::clone(&cancel);
            let source = Arc::clone(&self.source);
            pool.spawn(move || {
                if cancel.load(Ordering::Acquire) {
                    tracing::debug!(%resource, "page closed before fetch started");
                    return;
                }
                let result = fetch_document(source.as_ref(), resource);
                if cancel.load(Ordering::Acquire) {
                    tracing::debug!(%resource, "page closed; discarding response");
                    return;
                }
                // The receiver is gone only if the loader was dropped, which
                // also cancels; nothing to do either way.
                let _ = tx.send((resource, result));
            });
        }

        Ok(PageLoader {
            data,
            rx,
            cancel,
            _pool: pool,
        })
    }

    /// Load `resources` concurrently and wait for all of them.
    pub fn load_all(&self, resources: &[Resource]) -> PageData {
        let source = self.source.as_ref();
        let results: Vec<(Resource, Result<Document, FetchError>)> = self.pool.install(|| {
            resources
                .par_iter()
                .map(|&resource| (resource, fetch_document(source, resource)))
                .collect()
        });

        let mut data = PageData::new();
        for (resource, result) in results {
            data.mark_loading(resource);
            data.resolve(resource, result);
        }
        data
    }
}

fn fetch_pool(threads: usize) -> Result<rayon::ThreadPool, AppError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("fetch-{i}"))
        .build()
        .map_err(|e| AppError::runtime(format!("Failed to start fetch pool: {e}")))
}

/// The in-flight loads of one page view.
pub struct PageLoader {
    data: PageData,
    rx: Receiver<(Resource, Result<Document, FetchError>)>,
    cancel: Arc<AtomicBool>,
    // Spawned jobs keep the pool's threads alive past this handle.
    _pool: rayon::ThreadPool,
}

impl PageLoader {
    /// Apply every response received so far. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((resource, result)) = self.rx.try_recv() {
            self.data.resolve(resource, result);
            changed = true;
        }
        changed
    }

    pub fn data(&self) -> &PageData {
        &self.data
    }

    pub fn is_settled(&self) -> bool {
        self.data.is_settled()
    }
}

impl Drop for PageLoader {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Release);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    use super::*;

    /// In-memory source: file name → bytes. Missing files fail with `NotFound`.
    pub(crate) struct MemorySource(pub HashMap<&'static str, Vec<u8>>);

    impl MemorySource {
        pub(crate) fn with(files: &[(Resource, &str)]) -> Arc<dyn DataSource> {
            Arc::new(Self(
                files
                    .iter()
                    .map(|(r, body)| (r.file_name(), body.as_bytes().to_vec()))
                    .collect(),
            ))
        }
    }

    impl DataSource for MemorySource {
        fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError> {
            self.0.get(file_name).cloned().ok_or_else(|| FetchError::Io {
                path: file_name.into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    /// Blocks every fetch until the paired sender is dropped, then fails.
    struct GatedSource {
        gate: Mutex<mpsc::Receiver<()>>,
        calls: AtomicUsize,
    }

    impl DataSource for GatedSource {
        fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().unwrap();
            let _ = gate.recv();
            Err(FetchError::Io {
                path: file_name.into(),
                source: std::io::Error::new(std::io::ErrorKind::TimedOut, "gate closed"),
            })
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    fn wait_settled(loader: &mut PageLoader) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !loader.is_settled() && Instant::now() < deadline {
            loader.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        loader.poll();
    }

    #[test]
    fn load_resolves_each_resource_independently() {
        let source = MemorySource::with(&[(
            Resource::SummaryStats,
            r#"{"total_trade_games": 888, "bot_focus_count": 900, "top_focus_count": 876}"#,
        )]);
        let fetcher = Fetcher::new(source).unwrap();
        let mut loader = fetcher.load(&[Resource::SummaryStats, Resource::HeadData]).unwrap();
        wait_settled(&mut loader);

        assert_eq!(loader.data().summary_stats().unwrap().total_trade_games, 888);
        assert_eq!(*loader.data().state(Resource::HeadData), ResourceState::Failed);
        assert_eq!(*loader.data().state(Resource::PivotTable), ResourceState::NotRequested);
    }

    #[test]
    fn malformed_json_is_a_failed_resource() {
        let source = MemorySource::with(&[(Resource::PivotTable, "[{\"side\": ")]);
        let data = Fetcher::new(source).unwrap().load_all(&[Resource::PivotTable]);
        assert_eq!(*data.state(Resource::PivotTable), ResourceState::Failed);
        assert!(data.pivot_rows().is_none());
    }

    #[test]
    fn unresolved_fetch_stays_loading() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let source = Arc::new(GatedSource {
            gate: Mutex::new(gate_rx),
            calls: AtomicUsize::new(0),
        });
        let fetcher = Fetcher::new(source).unwrap();
        let mut loader = fetcher.load(&[Resource::HypothesisTests]).unwrap();

        for _ in 0..10 {
            assert!(!loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(*loader.data().state(Resource::HypothesisTests), ResourceState::Loading);
        assert!(!loader.is_settled());

        drop(loader);
        drop(gate_tx);
    }

    #[test]
    fn dropping_loader_skips_queued_fetches() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let source = Arc::new(GatedSource {
            gate: Mutex::new(gate_rx),
            calls: AtomicUsize::new(0),
        });
        let fetcher = Fetcher::with_threads(source.clone(), 1).unwrap();
        let loader = fetcher.load(&[Resource::ModelResults, Resource::SummaryStats]).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while source.calls.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        drop(loader);
        drop(gate_tx);
        std::thread::sleep(Duration::from_millis(100));

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    /// Hangs on `model_results.json`; serves the summary immediately.
    struct StallingSource {
        gated: GatedSource,
    }

    impl DataSource for StallingSource {
        fn fetch(&self, file_name: &str) -> Result<Vec<u8>, FetchError> {
            if file_name == Resource::ModelResults.file_name() {
                return self.gated.fetch(file_name);
            }
            Ok(br#"{"total_trade_games": 10, "bot_focus_count": 6, "top_focus_count": 4}"#.to_vec())
        }

        fn describe(&self) -> String {
            "stalling".to_string()
        }
    }

    #[test]
    fn hung_fetch_does_not_block_next_page() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let source = Arc::new(StallingSource {
            gated: GatedSource {
                gate: Mutex::new(gate_rx),
                calls: AtomicUsize::new(0),
            },
        });
        let fetcher = Fetcher::with_threads(source.clone(), 1).unwrap();

        let stale = fetcher.load(&[Resource::ModelResults]).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while source.gated.calls.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        drop(stale);

        let mut loader = fetcher.load(&[Resource::SummaryStats]).unwrap();
        wait_settled(&mut loader);
        assert_eq!(loader.data().summary_stats().unwrap().total_trade_games, 10);

        drop(gate_tx);
    }

    #[test]
    fn terminal_states_do_not_change() {
        let mut data = PageData::new();
        data.mark_loading(Resource::SummaryStats);
        data.resolve(
            Resource::SummaryStats,
            Err(FetchError::Io {
                path: "x".into(),
                source: std::io::Error::other("boom"),
            }),
        );
        data.resolve(Resource::SummaryStats, Ok(Document::PivotTable(Vec::new())));
        data.mark_loading(Resource::SummaryStats);
        assert_eq!(*data.state(Resource::SummaryStats), ResourceState::Failed);

        // Never requested: a stray response is ignored.
        data.resolve(Resource::HeadData, Ok(Document::HeadData(Vec::new())));
        assert_eq!(*data.state(Resource::HeadData), ResourceState::NotRequested);
    }
}
