//! SL HTTP client.
//!
//! Queries the realtime departures and typeahead endpoints. Each call makes
//! exactly one request and never retries.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::DepartureSource;
use crate::domain::{Departure, RouteFilter, Site};

use super::convert::{convert_realtime, convert_sites};
use super::error::SlError;
use super::types::{RealtimeResponse, TypeaheadResponse};

/// Default base URL for the SL APIs.
pub const DEFAULT_BASE_URL: &str = "https://api.sl.se/api2";

/// Lookup window for realtime departures, in minutes.
pub const DEFAULT_TIME_WINDOW_MINS: u16 = 40;

/// Configuration for the SL client.
#[derive(Debug, Clone)]
pub struct SlConfig {
    /// Key for the realtime departures API
    pub realtime_key: String,
    /// Key for the typeahead API, only needed for lookups
    pub lookup_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Realtime lookup window in minutes
    pub time_window_mins: u16,
}

impl SlConfig {
    /// Create a new config with the given realtime key.
    pub fn new(realtime_key: impl Into<String>) -> Self {
        Self {
            realtime_key: realtime_key.into(),
            lookup_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            time_window_mins: DEFAULT_TIME_WINDOW_MINS,
        }
    }

    /// Set the typeahead key.
    pub fn with_lookup_key(mut self, key: impl Into<String>) -> Self {
        self.lookup_key = Some(key.into());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// SL API client.
#[derive(Debug, Clone)]
pub struct SlClient {
    http: reqwest::Client,
    base_url: String,
    realtime_key: String,
    lookup_key: Option<String>,
    time_window_mins: u16,
}

impl SlClient {
    /// Create a new SL client with the given configuration.
    pub fn new(config: SlConfig) -> Result<Self, SlError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            realtime_key: config.realtime_key,
            lookup_key: config.lookup_key,
            time_window_mins: config.time_window_mins,
        })
    }

    /// Get the upcoming departures for a route.
    ///
    /// Returns only entries matching the route's mode, line and destination,
    /// in the order the API sent them.
    pub async fn get_departures(&self, route: &RouteFilter) -> Result<Vec<Departure>, SlError> {
        let url = format!("{}/realtimedeparturesV4.json", self.base_url);
        debug!(%route, window = self.time_window_mins, "fetching realtime departures");

        let response: RealtimeResponse = self
            .get_json(
                &url,
                &[
                    ("key", self.realtime_key.clone()),
                    ("siteid", route.station_id.to_string()),
                    ("timewindow", self.time_window_mins.to_string()),
                ],
            )
            .await?;

        let departures = convert_realtime(&response, route)?;
        debug!(count = departures.len(), "matched departures");
        Ok(departures)
    }

    /// Search for stops by name.
    pub async fn lookup_sites(&self, search: &str) -> Result<Vec<Site>, SlError> {
        let key = self
            .lookup_key
            .as_deref()
            .ok_or(SlError::NotConfigured("api_key_lookup"))?;

        let url = format!("{}/typeahead.json", self.base_url);
        debug!(search, "looking up sites");

        let response: TypeaheadResponse = self
            .get_json(
                &url,
                &[
                    ("searchstring", search.to_string()),
                    ("key", key.to_string()),
                ],
            )
            .await?;

        convert_sites(&response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SlError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlError::Http {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| SlError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl DepartureSource for SlClient {
    async fn fetch_departures(&self, route: &RouteFilter) -> Result<Vec<Departure>, SlError> {
        self.get_departures(route).await
    }
}
