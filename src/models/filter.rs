//! Structured filter configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};
use validator::{Validate, ValidationError, ValidationErrors};

/// Upper bound of the salary slider
pub const SALARY_RANGE_MAX: u64 = 500_000;

/// Inclusive salary bounds, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
}

impl SalaryRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// The unrestricted `[0, 500000]` range
    pub fn full() -> Self {
        Self::new(0, SALARY_RANGE_MAX)
    }

    /// True when the range has not been narrowed
    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self::full()
    }
}

impl From<[u64; 2]> for SalaryRange {
    fn from([min, max]: [u64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<SalaryRange> for [u64; 2] {
    fn from(range: SalaryRange) -> Self {
        [range.min, range.max]
    }
}

/// Set-valued filter dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterDimension {
    Company,
    Location,
    Department,
    EmploymentType,
}

/// Multi-dimensional predicate configuration
///
/// Empty sets place no restriction on their dimension. The default value is
/// the "reset" state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSet {
    /// Exact company names
    pub companies: BTreeSet<String>,

    /// Case-insensitive location fragments
    pub locations: BTreeSet<String>,

    /// Exact department names
    pub departments: BTreeSet<String>,

    /// Exact employment types
    pub employment_types: BTreeSet<String>,

    /// Keep only remote postings
    pub remote: bool,

    /// Inclusive salary bounds
    pub salary_range: SalaryRange,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies = companies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_employment_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.employment_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    pub fn with_salary_range(mut self, min: u64, max: u64) -> Self {
        self.salary_range = SalaryRange::new(min, max);
        self
    }

    fn values_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Company => &mut self.companies,
            FilterDimension::Location => &mut self.locations,
            FilterDimension::Department => &mut self.departments,
            FilterDimension::EmploymentType => &mut self.employment_types,
        }
    }

    /// Add the value when absent, remove it when present
    pub fn toggle(&mut self, dimension: FilterDimension, value: impl Into<String>) {
        let value = value.into();
        let values = self.values_mut(dimension);
        if !values.remove(&value) {
            values.insert(value);
        }
    }

    /// Restore the unrestricted state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when any dimension narrows the collection
    pub fn is_active(&self) -> bool {
        !self.companies.is_empty()
            || !self.locations.is_empty()
            || !self.departments.is_empty()
            || !self.employment_types.is_empty()
            || self.remote
            || !self.salary_range.is_full()
    }
}

impl Validate for FilterSet {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let range = self.salary_range;

        if range.max > SALARY_RANGE_MAX {
            let mut error = ValidationError::new("salary_range_bounds");
            error.message = Some(format!("salary range must stay within [0, {SALARY_RANGE_MAX}]").into());
            errors.add("salary_range", error);
        }
        if range.min > range.max {
            let mut error = ValidationError::new("salary_range_order");
            error.message = Some("salary range minimum exceeds maximum".into());
            errors.add("salary_range", error);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
