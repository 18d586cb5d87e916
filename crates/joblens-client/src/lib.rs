//! HTTP fetch boundary for the job list and the city suggestion endpoint.
//!
//! All network errors are converted to [`FetchError`] values here; callers
//! replace their working set only on `Ok`, so a failed fetch can never leave
//! partially-updated results behind.

use std::time::Duration;

use anyhow::Context;
use joblens_core::{normalize_job, City, JobRecord, RawJob, NOT_SPECIFIED};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, warn};

pub const CRATE_NAME: &str = "joblens-client";

/// Bounded per-request timeout; long enough for a cold backend, short
/// enough that the retry banner appears while the user still cares.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("JOBLENS_API_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("JOBLENS_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            user_agent: std::env::var("JOBLENS_USER_AGENT").ok(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("network error for {url}: {detail}")]
    Network { url: String, detail: String },
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("invalid payload from {url}: {detail}")]
    InvalidFormat { url: String, detail: String },
}

impl FetchError {
    /// Whether the UI should offer a retry action for this failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidFormat { .. } => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CitiesEnvelope {
    #[serde(default)]
    data: Vec<City>,
}

#[derive(Debug, Clone)]
pub struct JobsClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl JobsClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build().context("building reqwest client")?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Fetch and normalize the full job list. The payload must be a JSON
    /// array; individual malformed elements degrade to default-filled
    /// records instead of failing the fetch.
    pub async fn fetch_jobs(&self) -> Result<Vec<JobRecord>, FetchError> {
        let url = format!("{}/jobs", self.base_url());
        let body = self.get_json(&url).await?;
        let jobs = decode_jobs_payload(&url, body)?;
        debug!(url, count = jobs.len(), "fetched job list");
        Ok(jobs)
    }

    /// Fetch city suggestions for a name prefix.
    pub async fn fetch_cities(&self, prefix: &str) -> Result<Vec<City>, FetchError> {
        let url = format!("{}/cities", self.base_url());
        let response = self
            .client
            .get(&url)
            .query(&[("name", prefix)])
            .send()
            .await
            .map_err(|err| classify_request_error(&url, &err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }
        let body: JsonValue = response
            .json()
            .await
            .map_err(|err| classify_body_error(&url, &err))?;
        let envelope: CitiesEnvelope =
            serde_json::from_value(body).map_err(|err| FetchError::InvalidFormat {
                url: url.clone(),
                detail: format!("expected a {{data: [...]}} envelope: {err}"),
            })?;
        Ok(envelope.data)
    }

    async fn get_json(&self, url: &str) -> Result<JsonValue, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| classify_request_error(url, &err))?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "request failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response
            .json()
            .await
            .map_err(|err| classify_body_error(url, &err))
    }
}

fn classify_request_error(url: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            detail: err.to_string(),
        }
    }
}

fn classify_body_error(url: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_decode() {
        FetchError::InvalidFormat {
            url: url.to_string(),
            detail: err.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            detail: err.to_string(),
        }
    }
}

/// Guard the payload shape: anything but a top-level array is a fetch
/// failure, not a crash.
///
/// Records arriving without an id get a distinct position-based fallback so
/// downstream duplicate-id guards cannot collapse two id-less records.
fn decode_jobs_payload(url: &str, body: JsonValue) -> Result<Vec<JobRecord>, FetchError> {
    let JsonValue::Array(items) = body else {
        return Err(FetchError::InvalidFormat {
            url: url.to_string(),
            detail: "expected a JSON array of jobs".to_string(),
        });
    };
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let raw: RawJob = serde_json::from_value(item).unwrap_or_default();
            let mut record = normalize_job(&raw);
            if record.id == NOT_SPECIFIED {
                record.id = format!("row-{idx}");
            }
            record
        })
        .collect())
}
