use crate::aggregation::dedup::DeduplicationSet;
use crate::aggregation::events::{AggregateEvent, AggregateOutcome, JobBatch, SourceFailure};
use crate::metrics::{
    JOBS_DEDUPLICATED_TOTAL, JOBS_RECEIVED_TOTAL, SOURCE_FETCHES_TOTAL,
    SOURCE_FETCH_DURATION_SECONDS,
};
use crate::sources::JobSource;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, warn};

/// Fans a load out to every source and merges results as they arrive
#[derive(Clone)]
pub struct Aggregator {
    sources: Vec<Arc<dyn JobSource>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn JobSource>>) -> Self {
        Self { sources }
    }

    /// Number of configured sources
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run one load, calling `on_batch` once per successful source
    ///
    /// All fetches are in flight at once on the current task. Each batch
    /// holds only jobs whose id was not delivered earlier in this load.
    /// Failed sources contribute nothing and never fail the load.
    pub async fn load<F>(&self, mut on_batch: F) -> AggregateOutcome
    where
        F: FnMut(JobBatch),
    {
        let start = Instant::now();

        let mut pending: FuturesUnordered<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                async move {
                    let fetch_start = Instant::now();
                    let result = source.fetch().await;
                    (source, result, fetch_start.elapsed())
                }
            })
            .collect();

        info!(sources = self.sources.len(), "Fetching jobs from all sources");

        let mut dedup = DeduplicationSet::new();
        let mut outcome = AggregateOutcome::default();

        while let Some((source, result, elapsed)) = pending.next().await {
            let name = source.name().to_string();
            SOURCE_FETCH_DURATION_SECONDS
                .with_label_values(&[&name])
                .observe(elapsed.as_secs_f64());

            match result {
                Ok(jobs) => {
                    SOURCE_FETCHES_TOTAL.with_label_values(&[&name, "success"]).inc();
                    JOBS_RECEIVED_TOTAL
                        .with_label_values(&[&name])
                        .inc_by(jobs.len() as f64);

                    let (fresh, dropped) = dedup.retain_new(jobs);
                    if dropped > 0 {
                        JOBS_DEDUPLICATED_TOTAL.inc_by(dropped as f64);
                        debug!(source = %name, dropped, "Dropped duplicate postings");
                    }

                    info!(
                        source = %name,
                        jobs = fresh.len(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Source resolved"
                    );

                    outcome.jobs.extend(fresh.iter().cloned());
                    outcome.succeeded.push(name.clone());
                    outcome.duplicates += dropped;
                    on_batch(JobBatch { source: name, jobs: fresh });
                }
                Err(e) => {
                    SOURCE_FETCHES_TOTAL.with_label_values(&[&name, "failure"]).inc();
                    warn!(source = %name, error = %e, "Source failed, contributing no jobs");
                    outcome.failed.push(SourceFailure {
                        source: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            jobs = outcome.jobs.len(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "All sources resolved"
        );

        outcome
    }

    /// Run one load in the background, streaming batches then a completion
    pub fn stream(&self) -> UnboundedReceiverStream<AggregateEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let aggregator = self.clone();

        tokio::spawn(async move {
            let batch_tx = tx.clone();
            let outcome = aggregator
                .load(move |batch| {
                    // Receiver gone means nobody is listening any more
                    let _ = batch_tx.send(AggregateEvent::Batch(batch));
                })
                .await;
            let _ = tx.send(AggregateEvent::Completed(outcome));
        });

        UnboundedReceiverStream::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, SourceDescriptor};
    use crate::sources::{SourceError, SourceResult};
    use async_trait::async_trait;
    use std::time::Duration;

    struct StaticSource {
        descriptor: SourceDescriptor,
        jobs: Vec<Job>,
        delay_ms: u64,
        fail: bool,
    }

    impl StaticSource {
        fn new(name: &str, jobs: Vec<Job>, delay_ms: u64) -> Arc<dyn JobSource> {
            Arc::new(Self {
                descriptor: SourceDescriptor::new(name, name.to_lowercase()),
                jobs,
                delay_ms,
                fail: false,
            })
        }

        fn failing(name: &str) -> Arc<dyn JobSource> {
            Arc::new(Self {
                descriptor: SourceDescriptor::new(name, name.to_lowercase()),
                jobs: vec![],
                delay_ms: 0,
                fail: true,
            })
        }
    }

    #[async_trait]
    impl JobSource for StaticSource {
        fn descriptor(&self) -> &SourceDescriptor {
            &self.descriptor
        }

        async fn fetch(&self) -> SourceResult<Vec<Job>> {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            if self.fail {
                return Err(SourceError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(self.jobs.clone())
        }
    }

    #[tokio::test]
    async fn test_batches_arrive_in_completion_order() {
        let aggregator = Aggregator::new(vec![
            StaticSource::new("Slow", vec![Job::new("slow:1", "Slow job", "Slow")], 80),
            StaticSource::new("Fast", vec![Job::new("fast:1", "Fast job", "Fast")], 0),
        ]);

        let mut order = Vec::new();
        let outcome = aggregator.load(|batch| order.push(batch.source)).await;

        assert_eq!(order, vec!["Fast".to_string(), "Slow".to_string()]);
        assert_eq!(outcome.jobs[0].id, "fast:1");
        assert_eq!(outcome.jobs[1].id, "slow:1");
    }

    #[tokio::test]
    async fn test_failed_source_contributes_nothing() {
        let aggregator = Aggregator::new(vec![
            StaticSource::new("Good", vec![Job::new("good:1", "Job", "Good")], 0),
            StaticSource::failing("Bad"),
        ]);

        let outcome = aggregator.load(|_| {}).await;

        assert_eq!(outcome.jobs.len(), 1);
        assert_eq!(outcome.succeeded, vec!["Good".to_string()]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].source, "Bad");
        assert!(outcome.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_all_sources_failing() {
        let aggregator = Aggregator::new(vec![
            StaticSource::failing("A"),
            StaticSource::failing("B"),
        ]);

        let mut batches = 0;
        let outcome = aggregator.load(|_| batches += 1).await;

        assert_eq!(batches, 0);
        assert!(outcome.all_failed());
        assert!(outcome.into_result().is_err());
    }

    #[tokio::test]
    async fn test_duplicate_ids_delivered_once() {
        let shared = Job::new("shared:1", "Shared", "Shared");
        let aggregator = Aggregator::new(vec![
            StaticSource::new("First", vec![shared.clone()], 0),
            StaticSource::new("Second", vec![shared, Job::new("second:1", "Own", "Second")], 40),
        ]);

        let mut delivered = Vec::new();
        let outcome = aggregator
            .load(|batch| delivered.extend(batch.jobs.into_iter().map(|j| j.id)))
            .await;

        assert_eq!(delivered, vec!["shared:1".to_string(), "second:1".to_string()]);
        assert_eq!(outcome.jobs.len(), 2);
        assert_eq!(outcome.duplicates, 1);
    }

    #[tokio::test]
    async fn test_stream_terminates_with_completion() {
        let aggregator = Aggregator::new(vec![
            StaticSource::new("A", vec![Job::new("a:1", "A", "A")], 0),
            StaticSource::new("B", vec![Job::new("b:1", "B", "B")], 20),
        ]);

        let events: Vec<_> = aggregator.stream().collect().await;

        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], AggregateEvent::Batch(_)));
        assert!(matches!(events[1], AggregateEvent::Batch(_)));
        match &events[2] {
            AggregateEvent::Completed(outcome) => assert_eq!(outcome.jobs.len(), 2),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_sources() {
        let aggregator = Aggregator::new(vec![]);
        let outcome = aggregator.load(|_| {}).await;

        assert!(outcome.jobs.is_empty());
        assert!(!outcome.all_failed());
    }
}
