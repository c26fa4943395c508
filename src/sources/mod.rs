/// Upstream job-board adapters
///
/// Each source issues one request per load and normalizes heterogeneous
/// postings into the canonical [`Job`](crate::models::Job) shape. Failures
/// stay local to the source that produced them.
pub mod ashby;
pub mod error;
pub mod normalize;
pub mod traits;

pub use ashby::{build_client, AshbySource};
pub use error::{SourceError, SourceResult};
pub use normalize::{normalize_employment_type, LocationResolver, PostalAddress};
pub use traits::JobSource;

use crate::config::SourcesConfig;
use std::sync::Arc;

/// Build one source per configured board, sharing a client and resolver
pub fn build_sources(config: &SourcesConfig) -> SourceResult<Vec<Arc<dyn JobSource>>> {
    let client = build_client(config.timeout_secs)?;
    let locations = Arc::new(LocationResolver::new(config.city_aliases.clone()));

    let sources = config
        .boards
        .iter()
        .cloned()
        .map(|descriptor| {
            Arc::new(AshbySource::with_client(
                client.clone(),
                descriptor,
                config,
                Arc::clone(&locations),
            )) as Arc<dyn JobSource>
        })
        .collect();

    Ok(sources)
}
