//! TfL Unified API HTTP client.
//!
//! Provides async methods for the live line and arrival endpoints.
//! Handles authentication and decoding into DTOs.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::TflError;
use super::feed::LiveFeed;
use super::types::{Disruption, LineRoute, Mode, Prediction, RouteSequence};

/// Default base URL for the TfL Unified API.
const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// How much of an unparsable body to keep in errors.
const BODY_SNIPPET_LEN: usize = 500;

/// Configuration for the TfL client.
#[derive(Debug, Clone)]
pub struct TflConfig {
    /// Application key sent as the `app_key` query parameter
    pub app_key: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds; no timeout when unset
    pub timeout_secs: Option<u64>,
}

impl TflConfig {
    /// Create a config for the production API without an app key.
    pub fn new() -> Self {
        Self {
            app_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }

    /// Set the application key.
    pub fn with_app_key(mut self, key: impl Into<String>) -> Self {
        self.app_key = Some(key.into());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for TflConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// TfL Unified API client.
#[derive(Debug, Clone)]
pub struct TflClient {
    http: reqwest::Client,
    base_url: Url,
    app_key: Option<String>,
}

impl TflClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TflConfig) -> Result<Self, TflError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| TflError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(TflError::InvalidBaseUrl {
                url: config.base_url,
                message: "URL cannot have path segments".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            app_key: config.app_key,
        })
    }

    /// Get every transport mode known to the API.
    pub async fn get_modes(&self) -> Result<Vec<Mode>, TflError> {
        self.get_json(self.url(&["Line", "Meta", "Modes"])).await
    }

    /// Get current disruptions on all lines of the given modes.
    pub async fn get_disruptions(&self, modes: &[String]) -> Result<Vec<Disruption>, TflError> {
        let modes = modes.join(",");
        self.get_json(self.url(&["Line", "Mode", modes.as_str(), "Disruption"]))
            .await
    }

    /// Get the lines (with their route sections) of the given modes.
    pub async fn get_routes(&self, modes: &[String]) -> Result<Vec<LineRoute>, TflError> {
        let modes = modes.join(",");
        self.get_json(self.url(&["Line", "Mode", modes.as_str(), "Route"]))
            .await
    }

    /// Get the ordered stop sequence of a line in one direction.
    pub async fn get_route_sequence(
        &self,
        line: &str,
        direction: &str,
    ) -> Result<RouteSequence, TflError> {
        self.get_json(self.url(&["Line", line, "Route", "Sequence", direction]))
            .await
    }

    /// Get arrival predictions for every stop on the given lines.
    pub async fn get_arrivals(&self, lines: &[String]) -> Result<Vec<Prediction>, TflError> {
        let lines = lines.join(",");
        self.get_json(self.url(&["Line", lines.as_str(), "Arrivals"])).await
    }

    /// Get arrival predictions for the given lines at one stop point.
    pub async fn get_arrivals_at(
        &self,
        stop_point: &str,
        lines: &[String],
    ) -> Result<Vec<Prediction>, TflError> {
        let lines = lines.join(",");
        self.get_json(self.url(&["Line", lines.as_str(), "Arrivals", stop_point]))
            .await
    }

    /// Build a request URL below the base URL. Segments are percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always accepts path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TflError> {
        debug!(path = url.path(), "fetching from TfL");

        let path = url.path().to_string();
        let mut request = self.http.get(url);
        if let Some(key) = &self.app_key {
            request = request.query(&[("app_key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TflError::Unauthorized);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TflError::RateLimited);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(TflError::NotFound(path));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TflError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_SNIPPET_LEN).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TflError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_LEN).collect()),
        })
    }
}

impl LiveFeed for TflClient {
    fn modes(&self) -> BoxFuture<'_, Result<Vec<Mode>, TflError>> {
        self.get_modes().boxed()
    }

    fn disruptions<'a>(
        &'a self,
        modes: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Disruption>, TflError>> {
        self.get_disruptions(modes).boxed()
    }

    fn routes<'a>(
        &'a self,
        modes: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<LineRoute>, TflError>> {
        self.get_routes(modes).boxed()
    }

    fn route_sequence<'a>(
        &'a self,
        line: &'a str,
        direction: &'a str,
    ) -> BoxFuture<'a, Result<RouteSequence, TflError>> {
        self.get_route_sequence(line, direction).boxed()
    }

    fn arrivals<'a>(
        &'a self,
        lines: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Prediction>, TflError>> {
        self.get_arrivals(lines).boxed()
    }

    fn arrivals_at<'a>(
        &'a self,
        stop_point: &'a str,
        lines: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Prediction>, TflError>> {
        self.get_arrivals_at(stop_point, lines).boxed()
    }
}
