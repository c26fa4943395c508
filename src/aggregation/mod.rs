/// Concurrent fan-out over all sources with incremental, deduplicated merging
pub mod aggregator;
pub mod dedup;
pub mod events;

pub use aggregator::Aggregator;
pub use dedup::DeduplicationSet;
pub use events::{AggregateEvent, AggregateOutcome, JobBatch, SourceFailure};
