//! Structured predicate filtering

use crate::models::{FilterSet, Job};
use crate::pipeline::salary::extract_salary_value;

/// A `FilterSet` with location fragments pre-lowercased
struct CompiledFilter<'f> {
    filters: &'f FilterSet,
    locations: Vec<String>,
}

impl<'f> CompiledFilter<'f> {
    fn new(filters: &'f FilterSet) -> Self {
        Self {
            filters,
            locations: filters.locations.iter().map(|l| l.to_lowercase()).collect(),
        }
    }

    fn matches(&self, job: &Job) -> bool {
        let f = self.filters;

        if !f.companies.is_empty() && !f.companies.contains(&job.company_name) {
            return false;
        }

        if !self.locations.is_empty() {
            let location = job.location.to_lowercase();
            if !self.locations.iter().any(|fragment| location.contains(fragment.as_str())) {
                return false;
            }
        }

        if !f.departments.is_empty() && !f.departments.contains(&job.department) {
            return false;
        }

        if !f.employment_types.is_empty() && !f.employment_types.contains(&job.employment_type) {
            return false;
        }

        if f.remote && !job.remote {
            return false;
        }

        if !f.salary_range.is_full() {
            let value = extract_salary_value(job.salary.as_deref(), false);
            if !f.salary_range.contains(value) {
                return false;
            }
        }

        true
    }
}

/// True when `job` passes every dimension of `filters`
pub fn matches(job: &Job, filters: &FilterSet) -> bool {
    CompiledFilter::new(filters).matches(job)
}

/// Order-preserving subsequence of `jobs` passing `filters`
pub fn apply_filters<'a>(
    jobs: impl IntoIterator<Item = &'a Job>,
    filters: &FilterSet,
) -> Vec<&'a Job> {
    let compiled = CompiledFilter::new(filters);
    jobs.into_iter().filter(|job| compiled.matches(job)).collect()
}
