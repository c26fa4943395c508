use crate::models::Job;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct values available to each filter dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub companies: Vec<String>,
    pub locations: Vec<String>,
    pub departments: Vec<String>,
    pub employment_types: Vec<String>,
}

/// Sorted, de-duplicated values of every filterable field
pub fn facets<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Facets {
    let mut companies = BTreeSet::new();
    let mut locations = BTreeSet::new();
    let mut departments = BTreeSet::new();
    let mut employment_types = BTreeSet::new();

    for job in jobs {
        companies.insert(job.company_name.as_str());
        locations.insert(job.location.as_str());
        departments.insert(job.department.as_str());
        employment_types.insert(job.employment_type.as_str());
    }

    fn owned(values: BTreeSet<&str>) -> Vec<String> {
        values.into_iter().map(str::to_string).collect()
    }

    Facets {
        companies: owned(companies),
        locations: owned(locations),
        departments: owned(departments),
        employment_types: owned(employment_types),
    }
}
