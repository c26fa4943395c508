use crate::models::{Job, SourceDescriptor};
use crate::sources::error::SourceResult;
use async_trait::async_trait;
use tracing::warn;

/// An upstream job board
#[async_trait]
pub trait JobSource: Send + Sync + 'static {
    /// Board this source fetches
    fn descriptor(&self) -> &SourceDescriptor;

    /// Display name of the source
    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Issue one request and normalize every posting in the response
    async fn fetch(&self) -> SourceResult<Vec<Job>>;

    /// Fetch, logging and swallowing any failure
    async fn fetch_or_empty(&self) -> Vec<Job> {
        match self.fetch().await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(source = %self.name(), error = %e, "Source fetch failed, using empty result");
                Vec::new()
            }
        }
    }
}
