//! Ashby posting-API adapter

use crate::config::SourcesConfig;
use crate::models::{Job, SourceDescriptor, DEFAULT_DEPARTMENT, UNTITLED_POSITION};
use crate::sources::error::{SourceError, SourceResult};
use crate::sources::normalize::{normalize_employment_type, LocationResolver, PostalAddress};
use crate::sources::traits::JobSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Deserialize a field, falling back to `None` when its shape is wrong
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
struct BoardResponse {
    jobs: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPosting {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    address: Option<RawAddress>,
    #[serde(default, deserialize_with = "lenient")]
    is_remote: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    compensation: Option<RawCompensation>,
    #[serde(default, deserialize_with = "lenient")]
    department: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    employment_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description_plain: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description_html: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    job_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    apply_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    #[serde(default, deserialize_with = "lenient")]
    postal_address: Option<RawPostalAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPostalAddress {
    #[serde(default, deserialize_with = "lenient")]
    address_locality: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    address_region: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    address_country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompensation {
    #[serde(default, deserialize_with = "lenient")]
    compensation_tier_summary: Option<String>,
}

fn first_non_blank(candidates: &[Option<&String>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Job source backed by one Ashby job board
pub struct AshbySource {
    client: Client,
    descriptor: SourceDescriptor,
    endpoint: String,
    apply_base_url: String,
    include_compensation: bool,
    timeout_secs: u64,
    locations: Arc<LocationResolver>,
}

impl AshbySource {
    /// Create a source with its own HTTP client
    pub fn new(descriptor: SourceDescriptor, config: &SourcesConfig) -> SourceResult<Self> {
        let client = build_client(config.timeout_secs)?;
        let locations = Arc::new(LocationResolver::new(config.city_aliases.clone()));
        Ok(Self::with_client(client, descriptor, config, locations))
    }

    /// Create a source sharing an existing client and resolver
    pub fn with_client(
        client: Client,
        descriptor: SourceDescriptor,
        config: &SourcesConfig,
        locations: Arc<LocationResolver>,
    ) -> Self {
        let endpoint = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            descriptor.board_id
        );

        Self {
            client,
            descriptor,
            endpoint,
            apply_base_url: config.apply_base_url.trim_end_matches('/').to_string(),
            include_compensation: config.include_compensation,
            timeout_secs: config.timeout_secs,
            locations,
        }
    }

    /// Request URL without query parameters
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn normalize(&self, raw: RawPosting) -> Job {
        let raw_id = first_non_blank(&[raw.id.as_ref()])
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let title = first_non_blank(&[raw.title.as_ref()])
            .unwrap_or_else(|| UNTITLED_POSITION.to_string());

        let address = raw
            .address
            .and_then(|a| a.postal_address)
            .map(|p| PostalAddress {
                locality: p.address_locality,
                region: p.address_region,
                country: p.address_country,
            });
        let location = self
            .locations
            .resolve(raw.location.as_deref(), address.as_ref());

        let salary = raw
            .compensation
            .and_then(|c| first_non_blank(&[c.compensation_tier_summary.as_ref()]));

        let department = first_non_blank(&[raw.department.as_ref()])
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        let url = first_non_blank(&[raw.job_url.as_ref(), raw.apply_url.as_ref()]).unwrap_or_else(
            || format!("{}/{}/{}", self.apply_base_url, self.descriptor.board_id, raw_id),
        );

        let description =
            first_non_blank(&[raw.description_plain.as_ref(), raw.description_html.as_ref()])
                .unwrap_or_default();

        Job {
            id: format!("{}:{}", self.descriptor.board_id, raw_id),
            title,
            company_name: self.descriptor.name.clone(),
            location,
            remote: raw.is_remote.unwrap_or(false),
            salary,
            department,
            employment_type: normalize_employment_type(raw.employment_type.as_deref()),
            url,
            description,
        }
    }

    /// Normalize a response body into jobs
    pub fn parse_body(&self, body: &str) -> SourceResult<Vec<Job>> {
        let response: BoardResponse = serde_json::from_str(body)?;
        let Some(postings) = response.jobs else {
            return Err(SourceError::InvalidResponse(
                "response has no jobs array".to_string(),
            ));
        };

        let jobs = postings
            .into_iter()
            .map(|value| {
                let raw = serde_json::from_value::<RawPosting>(value).unwrap_or_else(|e| {
                    warn!(source = %self.descriptor.name, error = %e, "Unreadable posting, using defaults");
                    RawPosting::default()
                });
                self.normalize(raw)
            })
            .collect();

        Ok(jobs)
    }
}

/// Build the HTTP client used for board requests
pub fn build_client(timeout_secs: u64) -> SourceResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("job-aggregator/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SourceError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

#[async_trait]
impl JobSource for AshbySource {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn fetch(&self) -> SourceResult<Vec<Job>> {
        debug!(source = %self.descriptor.name, url = %self.endpoint, "Fetching jobs");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("includeCompensation", self.include_compensation)])
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout_secs)
                } else {
                    SourceError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let jobs = self.parse_body(&body)?;
        info!(source = %self.descriptor.name, jobs = jobs.len(), "Fetched jobs");
        Ok(jobs)
    }
}
