use crate::models::Job;
use std::collections::HashSet;

/// Tracks which job ids have already been delivered
#[derive(Debug, Default, Clone)]
pub struct DeduplicationSet {
    seen: HashSet<String>,
}

impl DeduplicationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the set with jobs that are already visible
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        Self {
            seen: jobs.into_iter().map(|job| job.id.clone()).collect(),
        }
    }

    /// Keep the jobs whose id has not been seen, in order, and mark them seen
    ///
    /// Returns the fresh jobs and the number dropped.
    pub fn retain_new(&mut self, jobs: Vec<Job>) -> (Vec<Job>, usize) {
        let incoming = jobs.len();
        let fresh: Vec<Job> = jobs
            .into_iter()
            .filter(|job| self.seen.insert(job.id.clone()))
            .collect();
        let dropped = incoming - fresh.len();
        (fresh, dropped)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
