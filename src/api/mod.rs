pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::board::JobBoard;
use crate::config::PresentationConfig;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<JobBoard>,
    pub presentation: Arc<PresentationConfig>,
    pub metrics_enabled: bool,
}

impl AppState {
    pub fn new(board: Arc<JobBoard>) -> Self {
        Self {
            board,
            presentation: Arc::new(PresentationConfig::default()),
            metrics_enabled: true,
        }
    }

    /// Set the presentation settings served to clients
    pub fn with_presentation(mut self, presentation: PresentationConfig) -> Self {
        self.presentation = Arc::new(presentation);
        self
    }

    /// Enable or disable the Prometheus endpoint
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }
}
