use serde::{Deserialize, Serialize};

/// Title used when a posting has none
pub const UNTITLED_POSITION: &str = "Untitled Position";

/// Location used when neither a flat location nor an address is present
pub const LOCATION_NOT_SPECIFIED: &str = "Location not specified";

/// Department used when a posting has none
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Employment type used when a posting has none
pub const EMPLOYMENT_TYPE_NOT_SPECIFIED: &str = "Not specified";

/// Label shown for a posting without compensation details
pub const SALARY_NOT_SPECIFIED: &str = "Salary not specified";

/// A normalized job posting
///
/// Jobs are built once by a source adapter and never mutated afterwards;
/// every downstream stage produces new collections instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Identifier, unique across all sources (`board_id:raw_id`)
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Company the source represents
    pub company_name: String,

    /// Resolved location label
    pub location: String,

    /// Remote-eligible posting
    pub remote: bool,

    /// Free-form compensation summary, e.g. "$120K – $150K"
    pub salary: Option<String>,

    /// Department or team
    pub department: String,

    /// Split-word employment type, e.g. "Full time"
    pub employment_type: String,

    /// Link to apply
    pub url: String,

    /// Plain-text or HTML description
    pub description: String,
}

impl Job {
    /// Create a job with placeholder values for everything but the identity fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company_name: company_name.into(),
            location: LOCATION_NOT_SPECIFIED.to_string(),
            remote: false,
            salary: None,
            department: DEFAULT_DEPARTMENT.to_string(),
            employment_type: EMPLOYMENT_TYPE_NOT_SPECIFIED.to_string(),
            url: String::new(),
            description: String::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_employment_type(mut self, employment_type: impl Into<String>) -> Self {
        self.employment_type = employment_type.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Salary text for display
    pub fn salary_label(&self) -> &str {
        self.salary.as_deref().unwrap_or(SALARY_NOT_SPECIFIED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_defaults() {
        let job = Job::new("openai:1", "Research Engineer", "OpenAI");

        assert_eq!(job.location, LOCATION_NOT_SPECIFIED);
        assert_eq!(job.department, DEFAULT_DEPARTMENT);
        assert_eq!(job.employment_type, EMPLOYMENT_TYPE_NOT_SPECIFIED);
        assert!(!job.remote);
        assert_eq!(job.salary_label(), SALARY_NOT_SPECIFIED);
    }

    #[test]
    fn test_serializes_camel_case() {
        let job = Job::new("openai:1", "Research Engineer", "OpenAI").with_salary("$200K");
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["companyName"], "OpenAI");
        assert_eq!(value["employmentType"], "Not specified");
        assert_eq!(value["salary"], "$200K");
    }
}
