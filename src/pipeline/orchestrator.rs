use crate::models::{FilterSet, Job, SortOption};
use crate::pipeline::filter::apply_filters;
use crate::pipeline::scorer::{rank, NormalizedQuery};
use crate::pipeline::sort::sort_jobs;
use serde::{Deserialize, Serialize};

/// The user-controlled inputs of the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub query: String,
    pub filters: FilterSet,
    pub sort: SortOption,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Relevance order replaces the sort option while a query is present
    pub fn is_query_mode(&self) -> bool {
        !NormalizedQuery::new(&self.query).is_blank()
    }
}

/// Derive the displayed collection from the raw jobs and the view
///
/// With a non-blank query the jobs are ranked by relevance, non-matches
/// dropped, and the filters applied on top; the sort option is ignored.
/// Otherwise the filters run over the raw collection and the sort option
/// orders the result. Pure: equal inputs give equal outputs.
pub fn run(jobs: &[Job], view: &ViewState) -> Vec<Job> {
    let selected = if view.is_query_mode() {
        let ranked = rank(jobs, &view.query);
        apply_filters(ranked, &view.filters)
    } else {
        let mut filtered = apply_filters(jobs, &view.filters);
        sort_jobs(&mut filtered, view.sort);
        filtered
    };

    selected.into_iter().cloned().collect()
}
