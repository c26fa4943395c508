/// Live job board: the raw collection, the user's view and the derived
/// displayed collection, kept consistent as loads and inputs arrive.
///
/// Every input change and every incremental batch triggers a synchronous
/// recompute from the latest inputs under the write lock, so a result is
/// never derived from inputs older than the ones already published.
pub mod debounce;

pub use debounce::Debouncer;

use crate::aggregation::{AggregateOutcome, Aggregator, DeduplicationSet, JobBatch};
use crate::error::Result;
use crate::metrics::{DISPLAYED_JOBS, PIPELINE_RECOMPUTE_DURATION_SECONDS};
use crate::models::{FilterSet, Job, SortOption};
use crate::pipeline::{self, Facets, ViewState};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use validator::Validate;

/// Message shown when no source could be loaded
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load jobs";

/// Loading indicators for the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStatus {
    /// A load is running and nothing has arrived yet
    pub loading: bool,

    /// A load is running and some jobs are already visible
    pub loading_more: bool,

    pub error: Option<String>,

    /// Size of the raw collection
    pub total_jobs: usize,

    /// Size of the displayed collection
    pub displayed_jobs: usize,

    /// Sources that failed during the last completed load
    pub failed_sources: Vec<String>,

    pub last_loaded_at: Option<DateTime<Utc>>,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub jobs: Vec<Job>,
    pub status: LoadStatus,
    pub view: ViewState,
}

/// Partial view change; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewUpdate {
    #[validate(length(max = 200))]
    pub query: Option<String>,

    pub filters: Option<FilterSet>,

    pub sort: Option<SortOption>,
}

impl ViewUpdate {
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        if let Some(filters) = &self.filters {
            filters.validate()?;
        }
        Ok(self)
    }
}

#[derive(Debug, Default)]
struct BoardState {
    raw: Arc<Vec<Job>>,
    view: ViewState,
    displayed: Arc<Vec<Job>>,
    in_flight: bool,
    /// Ids visible during the running load
    dedup: DeduplicationSet,
    error: Option<String>,
    failed_sources: Vec<String>,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl BoardState {
    fn status(&self) -> LoadStatus {
        LoadStatus {
            loading: self.in_flight && self.raw.is_empty(),
            loading_more: self.in_flight && !self.raw.is_empty(),
            error: self.error.clone(),
            total_jobs: self.raw.len(),
            displayed_jobs: self.displayed.len(),
            failed_sources: self.failed_sources.clone(),
            last_loaded_at: self.last_loaded_at,
        }
    }

    fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            jobs: self.displayed.as_ref().clone(),
            status: self.status(),
            view: self.view.clone(),
        }
    }
}

/// Orchestrates loads and recomputes for one set of sources
pub struct JobBoard {
    state: RwLock<BoardState>,
    aggregator: Aggregator,
    updates: watch::Sender<BoardSnapshot>,
    debouncer: Debouncer,
}

impl JobBoard {
    pub fn new(aggregator: Aggregator, debounce: Duration) -> Self {
        let (updates, _) = watch::channel(BoardSnapshot::default());
        Self {
            state: RwLock::new(BoardState::default()),
            aggregator,
            updates,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Current displayed collection with status and view
    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.read().snapshot()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.read().status()
    }

    pub fn view(&self) -> ViewState {
        self.state.read().view.clone()
    }

    /// The raw collection as last replaced or merged
    pub fn raw_jobs(&self) -> Arc<Vec<Job>> {
        Arc::clone(&self.state.read().raw)
    }

    /// Filter options derived from the raw collection
    pub fn facets(&self) -> Facets {
        pipeline::facets(self.state.read().raw.iter())
    }

    /// Receive a snapshot after every recompute
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.updates.subscribe()
    }

    /// Set the query now, dropping any debounced query still waiting
    pub fn set_query(&self, query: impl Into<String>) {
        self.debouncer.cancel();
        self.apply_query(query.into());
    }

    fn apply_query(&self, query: String) {
        self.mutate(|state| state.view.query = query);
    }

    pub fn set_filters(&self, filters: FilterSet) -> Result<()> {
        filters.validate()?;
        self.mutate(|state| state.view.filters = filters);
        Ok(())
    }

    pub fn set_sort(&self, sort: SortOption) {
        self.mutate(|state| state.view.sort = sort);
    }

    /// Restore the unrestricted filter state
    pub fn reset_filters(&self) {
        self.mutate(|state| state.view.filters.reset());
    }

    /// Apply several inputs with a single recompute
    pub fn apply_view(&self, update: ViewUpdate) -> Result<BoardSnapshot> {
        let update = update.validated()?;
        if update.query.is_some() {
            self.debouncer.cancel();
        }
        Ok(self.mutate(|state| {
            if let Some(query) = update.query {
                state.view.query = query;
            }
            if let Some(filters) = update.filters {
                state.view.filters = filters;
            }
            if let Some(sort) = update.sort {
                state.view.sort = sort;
            }
        }))
    }

    /// Set the query once typing has paused for the debounce delay
    pub fn schedule_query(self: &Arc<Self>, query: impl Into<String>) {
        let query = query.into();
        let board: Weak<Self> = Arc::downgrade(self);
        self.debouncer.schedule(async move {
            if let Some(board) = board.upgrade() {
                debug!(query = %query, "Applying debounced query");
                board.apply_query(query);
            }
        });
    }

    /// True while a debounced query is waiting
    pub fn query_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Run a full load; `None` when another load is already running
    pub async fn load(&self) -> Option<LoadStatus> {
        if !self.begin_load() {
            return None;
        }
        self.run_load().await;
        Some(self.status())
    }

    /// Start a fresh load in the background; false if one is running
    pub fn reload(self: &Arc<Self>) -> bool {
        if !self.begin_load() {
            info!("Reload requested while a load is in flight, ignoring");
            return false;
        }

        let board = Arc::clone(self);
        tokio::spawn(async move {
            board.run_load().await;
        });
        true
    }

    fn begin_load(&self) -> bool {
        let snapshot = {
            let mut state = self.state.write();
            if state.in_flight {
                return false;
            }
            state.in_flight = true;
            state.dedup = DeduplicationSet::from_jobs(state.raw.iter());
            state.snapshot()
        };
        self.updates.send_replace(snapshot);
        true
    }

    async fn run_load(&self) {
        let outcome = self.aggregator.load(|batch| self.merge_batch(batch)).await;
        self.complete_load(outcome);
    }

    fn merge_batch(&self, batch: JobBatch) {
        let source = batch.source;
        self.mutate(|state| {
            let (fresh, _) = state.dedup.retain_new(batch.jobs);
            if fresh.is_empty() {
                return;
            }
            debug!(source = %source, jobs = fresh.len(), "Merging batch");
            let mut raw = state.raw.as_ref().clone();
            raw.extend(fresh);
            state.raw = Arc::new(raw);
        });
    }

    fn complete_load(&self, outcome: AggregateOutcome) {
        let failed: Vec<String> = outcome.failed.iter().map(|f| f.source.clone()).collect();
        let all_failed = outcome.all_failed();

        self.mutate(|state| {
            state.in_flight = false;
            state.dedup = DeduplicationSet::new();
            state.failed_sources = failed;

            if all_failed {
                // keep whatever an earlier load produced
                if state.raw.is_empty() {
                    state.error = Some(LOAD_FAILED_MESSAGE.to_string());
                }
            } else {
                state.raw = Arc::new(outcome.jobs);
                state.error = None;
                state.last_loaded_at = Some(Utc::now());
            }
        });

        let status = self.status();
        if let Some(error) = &status.error {
            warn!(error = %error, failed = ?status.failed_sources, "Load finished without jobs");
        } else {
            info!(
                total = status.total_jobs,
                displayed = status.displayed_jobs,
                failed = status.failed_sources.len(),
                "Load finished"
            );
        }
    }

    /// Mutate inputs, recompute and publish, all under one write lock
    fn mutate<F>(&self, change: F) -> BoardSnapshot
    where
        F: FnOnce(&mut BoardState),
    {
        let mut state = self.state.write();
        change(&mut *state);

        let start = Instant::now();
        let displayed = pipeline::run(&state.raw, &state.view);
        PIPELINE_RECOMPUTE_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());
        DISPLAYED_JOBS.set(displayed.len() as f64);

        state.displayed = Arc::new(displayed);
        let snapshot = state.snapshot();
        self.updates.send_replace(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceDescriptor;
    use crate::sources::{JobSource, SourceError, SourceResult};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Source whose jobs and failure can change between loads
    struct ScriptedSource {
        descriptor: SourceDescriptor,
        jobs: Mutex<Vec<Job>>,
        fail: Mutex<bool>,
        delay_ms: u64,
    }

    impl ScriptedSource {
        fn new(name: &str, jobs: Vec<Job>, delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                descriptor: SourceDescriptor::new(name, name.to_lowercase()),
                jobs: Mutex::new(jobs),
                fail: Mutex::new(false),
                delay_ms,
            })
        }
    }

    #[async_trait]
    impl JobSource for ScriptedSource {
        fn descriptor(&self) -> &SourceDescriptor {
            &self.descriptor
        }

        async fn fetch(&self) -> SourceResult<Vec<Job>> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            if *self.fail.lock() {
                return Err(SourceError::Http("connection refused".to_string()));
            }
            Ok(self.jobs.lock().clone())
        }
    }

    fn board(sources: Vec<Arc<dyn JobSource>>) -> Arc<JobBoard> {
        Arc::new(JobBoard::new(
            Aggregator::new(sources),
            Duration::from_millis(30),
        ))
    }

    #[tokio::test]
    async fn test_load_populates_and_recomputes() {
        let source = ScriptedSource::new(
            "OpenAI",
            vec![
                Job::new("openai:1", "Engineer", "OpenAI").with_salary("$100K"),
                Job::new("openai:2", "Designer", "OpenAI").with_salary("$200K"),
            ],
            0,
        );
        let board = board(vec![source]);

        board.set_sort(SortOption::SalaryDesc);
        let status = board.load().await.unwrap();

        assert!(!status.loading);
        assert!(!status.loading_more);
        assert_eq!(status.total_jobs, 2);
        assert!(status.last_loaded_at.is_some());
        assert_eq!(board.snapshot().jobs[0].title, "Designer");
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_sources() {
        let good = ScriptedSource::new("Good", vec![Job::new("good:1", "Job", "Good")], 0);
        let bad = ScriptedSource::new("Bad", vec![], 0);
        *bad.fail.lock() = true;
        let board = board(vec![good, bad]);

        let status = board.load().await.unwrap();
        assert_eq!(status.total_jobs, 1);
        assert_eq!(status.failed_sources, vec!["Bad".to_string()]);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_all_failed_sets_error() {
        let bad = ScriptedSource::new("Bad", vec![], 0);
        *bad.fail.lock() = true;
        let board = board(vec![bad]);

        let status = board.load().await.unwrap();
        assert_eq!(status.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(status.total_jobs, 0);
    }

    #[tokio::test]
    async fn test_loading_flags_during_incremental_delivery() {
        let fast = ScriptedSource::new("Fast", vec![Job::new("fast:1", "Fast", "Fast")], 0);
        let slow = ScriptedSource::new("Slow", vec![Job::new("slow:1", "Slow", "Slow")], 150);
        let board = board(vec![fast, slow]);

        assert!(board.reload());
        assert!(board.status().loading);
        assert!(!board.reload());

        tokio::time::sleep(Duration::from_millis(60)).await;
        let status = board.status();
        assert!(!status.loading);
        assert!(status.loading_more);
        assert_eq!(board.snapshot().jobs.len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let status = board.status();
        assert!(!status.loading_more);
        assert_eq!(status.total_jobs, 2);
    }

    #[tokio::test]
    async fn test_reload_replaces_collection() {
        let source = ScriptedSource::new("OpenAI", vec![Job::new("openai:1", "Old", "OpenAI")], 0);
        let board = board(vec![source.clone()]);
        board.load().await.unwrap();

        *source.jobs.lock() = vec![Job::new("openai:2", "New", "OpenAI")];
        board.load().await.unwrap();

        let raw = board.raw_jobs();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].title, "New");
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_jobs() {
        let source = ScriptedSource::new("OpenAI", vec![Job::new("openai:1", "Kept", "OpenAI")], 0);
        let board = board(vec![source.clone()]);
        board.load().await.unwrap();

        *source.fail.lock() = true;
        let status = board.load().await.unwrap();
        assert_eq!(status.total_jobs, 1);
        assert!(status.error.is_none());
        assert_eq!(status.failed_sources, vec!["OpenAI".to_string()]);
    }

    #[tokio::test]
    async fn test_query_mode_and_filters() {
        let source = ScriptedSource::new(
            "OpenAI",
            vec![
                Job::new("openai:1", "Engineer", "OpenAI").with_remote(true),
                Job::new("openai:2", "Engineering Manager", "OpenAI"),
                Job::new("openai:3", "Designer", "OpenAI"),
            ],
            0,
        );
        let board = board(vec![source]);
        board.load().await.unwrap();

        board.set_query("engineer");
        assert_eq!(board.snapshot().jobs.len(), 2);

        board
            .set_filters(FilterSet::new().with_remote(true))
            .unwrap();
        let snapshot = board.snapshot();
        assert_eq!(snapshot.jobs.len(), 1);
        assert_eq!(snapshot.status.displayed_jobs, 1);

        board.reset_filters();
        board.set_query("");
        assert_eq!(board.snapshot().jobs.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_filters_rejected() {
        let board = board(vec![]);
        let result = board.set_filters(FilterSet::new().with_salary_range(300_000, 100_000));
        assert!(result.is_err());
        assert!(board.view().filters.salary_range.is_full());
    }

    #[tokio::test]
    async fn test_apply_view_single_update() {
        let board = board(vec![]);
        let snapshot = board
            .apply_view(ViewUpdate {
                query: Some("research".to_string()),
                sort: Some(SortOption::AlphabeticalAsc),
                filters: None,
            })
            .unwrap();

        assert_eq!(snapshot.view.query, "research");
        assert_eq!(snapshot.view.sort, SortOption::AlphabeticalAsc);
    }

    #[tokio::test]
    async fn test_debounced_query_applies_last_value() {
        let board = board(vec![]);
        board.schedule_query("eng");
        board.schedule_query("engineer");
        assert!(board.query_pending());
        assert_eq!(board.view().query, "");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(board.view().query, "engineer");
    }

    #[tokio::test]
    async fn test_immediate_query_supersedes_debounced_one() {
        let board = board(vec![]);
        board.schedule_query("eng");
        board
            .apply_view(ViewUpdate {
                query: Some("designer".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(!board.query_pending());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(board.view().query, "designer");

        board.schedule_query("research");
        board.set_query("manager");
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(board.view().query, "manager");
    }

    #[tokio::test]
    async fn test_view_update_without_query_keeps_debounce() {
        let board = board(vec![]);
        board.schedule_query("eng");
        board
            .apply_view(ViewUpdate {
                sort: Some(SortOption::SalaryDesc),
                ..Default::default()
            })
            .unwrap();
        assert!(board.query_pending());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(board.view().query, "eng");
        assert_eq!(board.view().sort, SortOption::SalaryDesc);
    }

    #[tokio::test]
    async fn test_subscribers_see_latest_snapshot() {
        let source = ScriptedSource::new("OpenAI", vec![Job::new("openai:1", "Engineer", "OpenAI")], 0);
        let board = board(vec![source]);
        let mut updates = board.subscribe();

        board.load().await.unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_facets_follow_raw_collection() {
        let source = ScriptedSource::new(
            "OpenAI",
            vec![
                Job::new("openai:1", "A", "OpenAI").with_department("Research"),
                Job::new("openai:2", "B", "OpenAI").with_department("Applied"),
            ],
            0,
        );
        let board = board(vec![source]);
        board.load().await.unwrap();
        board.set_query("zzz");

        let facets = board.facets();
        assert_eq!(facets.departments, vec!["Applied", "Research"]);
        assert!(board.snapshot().jobs.is_empty());
    }
}
