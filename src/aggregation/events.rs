use crate::error::{AppError, Result};
use crate::models::Job;
use serde::Serialize;

/// Jobs newly delivered by one source
#[derive(Debug, Clone, Serialize)]
pub struct JobBatch {
    /// Source name
    pub source: String,

    /// Jobs not delivered by any earlier batch of the same load
    pub jobs: Vec<Job>,
}

/// A source that contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

impl From<SourceFailure> for AppError {
    fn from(failure: SourceFailure) -> Self {
        AppError::Source {
            source_name: failure.source,
            message: failure.error,
        }
    }
}

/// Final state of one load, after every source resolved
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateOutcome {
    /// Every unique job, in source-completion order
    pub jobs: Vec<Job>,

    /// Sources that answered
    pub succeeded: Vec<String>,

    /// Sources that failed
    pub failed: Vec<SourceFailure>,

    /// Postings dropped as duplicates
    pub duplicates: usize,
}

impl AggregateOutcome {
    /// True when sources were attempted and none answered
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }

    /// Error only when every source failed and nothing was loaded
    pub fn into_result(self) -> Result<Self> {
        if self.all_failed() && self.jobs.is_empty() {
            let sources = self
                .failed
                .iter()
                .map(|f| f.source.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::LoadFailed(format!("all sources failed ({sources})")));
        }
        Ok(self)
    }
}

/// Item of the aggregate stream
#[derive(Debug, Clone)]
pub enum AggregateEvent {
    /// One source resolved successfully
    Batch(JobBatch),

    /// All sources resolved; terminates the stream
    Completed(AggregateOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(source: &str) -> SourceFailure {
        SourceFailure {
            source: source.to_string(),
            error: "boom".to_string(),
        }
    }

    #[test]
    fn test_all_failed_is_error() {
        let outcome = AggregateOutcome {
            failed: vec![failure("OpenAI"), failure("Character")],
            ..Default::default()
        };
        assert!(outcome.all_failed());

        let err = outcome.into_result().unwrap_err();
        assert!(err.to_string().contains("OpenAI, Character"));
    }

    #[test]
    fn test_partial_failure_is_ok() {
        let outcome = AggregateOutcome {
            jobs: vec![Job::new("openai:1", "Engineer", "OpenAI")],
            succeeded: vec!["OpenAI".to_string()],
            failed: vec![failure("Character")],
            duplicates: 0,
        };
        assert!(!outcome.all_failed());
        assert!(outcome.into_result().is_ok());
    }

    #[test]
    fn test_failure_into_app_error() {
        let err = AppError::from(failure("Character"));
        assert_eq!(err.error_code(), "SOURCE_ERROR");
        assert_eq!(err.to_string(), "Source error (Character): boom");
    }

    #[test]
    fn test_empty_success_is_ok() {
        let outcome = AggregateOutcome {
            succeeded: vec!["OpenAI".to_string()],
            ..Default::default()
        };
        assert!(outcome.into_result().is_ok());
    }
}
