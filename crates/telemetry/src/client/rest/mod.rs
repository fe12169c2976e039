//! REST client implementation.
//!
//! Talks to the console's HTTP API with Bearer token authentication.
//!
//! # API Endpoints
//!
//! - Values: `GET {base}/api/v1/points/{xid}/values?from=&to=&rollup=&timePeriodType=&timePeriods=&limit=`
//! - Count: `GET {base}/api/v1/points/{xid}/values/count` (same parameters)
//! - Statistics: `GET {base}/api/v1/points/{xid}/statistics?from=&to=`
//! - Write: `PUT {base}/api/v1/points/{xid}/value` with a JSON body
//!
//! Timestamps go over the wire as ISO-8601; enum parameters use their
//! SCREAMING_SNAKE_CASE wire names.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::models::{PointStatistics, PointValue, PointWrite, ValueRangeQuery};

use super::TelemetryClient;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default console base URL for a local development server
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Response from the count endpoint.
#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

/// Connection settings for [`RestTelemetryClient`].
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Console base URL, without a trailing slash
    pub base_url: String,

    /// Bearer token sent with every request, when set
    pub api_token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl RestClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reqwest-backed console API client.
///
/// # Example
///
/// ```ignore
/// let config = RestClientConfig::new("https://console.plant.local").with_token(token);
/// let client = RestTelemetryClient::new(config);
/// let values = client.point_values("pump-7-flow", &query).await?;
/// ```
pub struct RestTelemetryClient {
    client: Client,
    config: RestClientConfig,
}

impl RestTelemetryClient {
    /// Create a new client from connection settings.
    pub fn new(config: RestClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn point_url(&self, xid: &str, tail: &str) -> String {
        format!("{}/api/v1/points/{}/{}", self.config.base_url, xid, tail)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode the JSON body, mapping HTTP failures
    /// onto the transport taxonomy.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        xid: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.with_auth(request).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::PointNotFound(xid.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

/// Build the wire query parameters for a range query.
fn query_params(query: &ValueRangeQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(from) = query.from {
        params.push(("from", iso8601(from)));
    }
    if let Some(to) = query.to {
        params.push(("to", iso8601(to)));
    }
    if let Some(rollup) = query.rollup {
        params.push(("rollup", rollup.as_str().to_string()));
    }
    if let Some(period_type) = query.time_period_type {
        params.push(("timePeriodType", period_type.as_str().to_string()));
    }
    if let Some(periods) = query.time_periods {
        params.push(("timePeriods", periods.to_string()));
    }
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

fn iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[async_trait]
impl TelemetryClient for RestTelemetryClient {
    async fn point_value_count(
        &self,
        xid: &str,
        query: &ValueRangeQuery,
    ) -> Result<u64, ApiError> {
        let url = self.point_url(xid, "values/count");
        debug!("counting values for {}", xid);
        let request = self.client.get(&url).query(&query_params(query));
        let response: CountResponse = self.execute(xid, request).await?;
        Ok(response.count)
    }

    async fn point_values(
        &self,
        xid: &str,
        query: &ValueRangeQuery,
    ) -> Result<Vec<PointValue>, ApiError> {
        let url = self.point_url(xid, "values");
        debug!("fetching values for {}", xid);
        let request = self.client.get(&url).query(&query_params(query));
        self.execute(xid, request).await
    }

    async fn statistics(
        &self,
        xid: &str,
        query: &ValueRangeQuery,
    ) -> Result<PointStatistics, ApiError> {
        let url = self.point_url(xid, "statistics");
        debug!("fetching statistics for {}", xid);
        let request = self.client.get(&url).query(&query_params(query));
        self.execute(xid, request).await
    }

    async fn write_point_value(
        &self,
        xid: &str,
        write: &PointWrite,
    ) -> Result<PointValue, ApiError> {
        let url = self.point_url(xid, "value");
        debug!("writing value to {}", xid);
        let request = self.client.put(&url).json(write);
        self.execute(xid, request).await
    }
}
