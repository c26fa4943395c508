/// Prometheus metrics for source fetches and pipeline recomputes.
///
/// Metrics are registered in a process-wide registry and exported in the
/// text exposition format by the `/metrics` endpoint.
///
/// # Example
/// ```no_run
/// use job_aggregator::metrics::JOBS_RECEIVED_TOTAL;
///
/// JOBS_RECEIVED_TOTAL.with_label_values(&["OpenAI"]).inc_by(12.0);
/// ```
use lazy_static::lazy_static;
use prometheus::{CounterVec, Counter, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Source fetches by outcome
    ///
    /// Labels: source, outcome (success|failure)
    pub static ref SOURCE_FETCHES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("source_fetches_total", "Total number of job-board fetches")
            .namespace("job_aggregator"),
        &["source", "outcome"]
    ).expect("Failed to create SOURCE_FETCHES_TOTAL metric");

    /// Source fetch latency in seconds
    ///
    /// Labels: source
    pub static ref SOURCE_FETCH_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "source_fetch_duration_seconds",
            "Job-board fetch duration in seconds"
        )
        .namespace("job_aggregator")
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["source"]
    ).expect("Failed to create SOURCE_FETCH_DURATION_SECONDS metric");

    /// Jobs received per source, before deduplication
    ///
    /// Labels: source
    pub static ref JOBS_RECEIVED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("jobs_received_total", "Total number of postings received")
            .namespace("job_aggregator"),
        &["source"]
    ).expect("Failed to create JOBS_RECEIVED_TOTAL metric");

    /// Postings dropped because their id was already delivered
    pub static ref JOBS_DEDUPLICATED_TOTAL: Counter = Counter::with_opts(
        Opts::new("jobs_deduplicated_total", "Total number of duplicate postings dropped")
            .namespace("job_aggregator")
    ).expect("Failed to create JOBS_DEDUPLICATED_TOTAL metric");

    /// Pipeline recompute latency in seconds
    pub static ref PIPELINE_RECOMPUTE_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pipeline_recompute_duration_seconds",
            "Search/filter/sort recompute duration in seconds"
        )
        .namespace("job_aggregator")
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5])
    ).expect("Failed to create PIPELINE_RECOMPUTE_DURATION_SECONDS metric");

    /// Size of the displayed collection after the last recompute
    pub static ref DISPLAYED_JOBS: Gauge = Gauge::with_opts(
        Opts::new("displayed_jobs", "Number of jobs in the displayed collection")
            .namespace("job_aggregator")
    ).expect("Failed to create DISPLAYED_JOBS metric");
}

/// Register all metrics with the global registry
///
/// Fails with `AlreadyReg` when called twice.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(SOURCE_FETCHES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SOURCE_FETCH_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(JOBS_RECEIVED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(JOBS_DEDUPLICATED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(PIPELINE_RECOMPUTE_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(DISPLAYED_JOBS.clone()))?;
    Ok(())
}

/// Gather all metrics in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
