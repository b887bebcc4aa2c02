//! clist.by contest listing API client
//!
//! Issues the single upstream request the cache refreshes from and hands the
//! raw body back to the caller. Parsing happens in [`super::normalize`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use super::Platform;

/// Base URL for the clist.by v2 contest endpoint
pub const CLIST_BASE_URL: &str = "https://clist.by/api/v2/contest/";

/// Default timeout for the upstream request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching the contest listing
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status} for {url}")]
    Status { status: StatusCode, url: String },
}

/// Anything that can produce a raw contest listing payload
#[async_trait]
pub trait ContestSource: Send + Sync {
    /// Fetches the raw response body
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Client for fetching the contest listing from clist.by
#[derive(Debug, Clone)]
pub struct ClistClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ClistClient {
    /// Create a new ClistClient with the default endpoint and timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a new ClistClient whose requests give up after `timeout`
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key))
    }

    /// Create a new ClistClient with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: CLIST_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Value of the `Authorization` header sent upstream
    fn authorization(&self) -> String {
        format!("ApiKey {}", self.api_key)
    }
}

#[async_trait]
impl ContestSource for ClistClient {
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let params = query_params(Utc::now());
        debug!(url = %self.base_url, end_gte = %params[1].1, "fetching contest listing");

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

/// Regex matching exactly the hostnames of the supported platforms
pub fn host_regex() -> String {
    Platform::all()
        .iter()
        .map(|p| p.host())
        .collect::<Vec<_>>()
        .join("|")
}

/// Query parameters for a listing of contests that have not ended by `now`
pub fn query_params(now: DateTime<Utc>) -> [(&'static str, String); 4] {
    [
        ("host__regex", host_regex()),
        ("end__gte", now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ("order_by", "start".to_string()),
        ("total_count", "true".to_string()),
    ]
}
