//! HTTP client for the weather aggregation API
//!
//! Six unauthenticated GET operations against one base URL. The client never
//! retries and never caches; every transport or non-2xx failure is returned to
//! the caller, which decides how loudly to report it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::ApiConfig;
use crate::models::{
    HistoryReading, HourlyPoint, SourceComparison, StatisticsSummary, TrendResult, WeatherReading,
};
use crate::{DashboardError, Result};

/// Lookback window used when the caller does not pick one
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

/// Responses slower than this are logged as a warning
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Operations offered by the aggregation API
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Most recent reading for a city
    async fn get_weather(&self, city: &str) -> Result<WeatherReading>;

    /// Raw readings of the lookback window
    async fn get_history(&self, city: &str, hours: u32) -> Result<Vec<HistoryReading>>;

    /// Aggregate statistics; `None` when the API has none for the city yet
    async fn get_stats(&self, city: &str, hours: u32) -> Result<Option<StatisticsSummary>>;

    /// Trend classification; `None` when the API has none for the city yet
    async fn get_trend(&self, city: &str, hours: u32) -> Result<Option<TrendResult>>;

    /// Per-source aggregates, in response order
    async fn compare_sources(&self, city: &str, hours: u32) -> Result<SourceComparison>;

    /// Hourly average temperatures, in response order
    async fn get_hourly(&self, city: &str, hours: u32) -> Result<Vec<HourlyPoint>>;
}

/// Response envelopes of the derived endpoints
mod envelope {
    use serde::Deserialize;

    use crate::models::{
        HistoryReading, HourlyPoint, SourceComparison, StatisticsSummary, TrendResult,
    };

    #[derive(Debug, Deserialize)]
    pub struct Stats {
        #[serde(default)]
        pub statistics: Option<StatisticsSummary>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Trend {
        #[serde(default)]
        pub trend_analysis: Option<TrendResult>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Hourly {
        #[serde(default)]
        pub hourly_data: Option<Vec<HourlyPoint>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Comparison {
        #[serde(default)]
        pub source_comparison: Option<SourceComparison>,
    }

    #[derive(Debug, Deserialize)]
    pub struct History {
        #[serde(default, alias = "readings", alias = "data")]
        pub history: Option<Vec<HistoryReading>>,
    }
}

/// reqwest-backed client for the aggregation API
#[derive(Debug, Clone)]
pub struct AggregatorClient {
    client: Client,
    base_url: String,
}

impl AggregatorClient {
    /// Create a new client. A timeout is only applied when one is configured.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder
            .build()
            .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn weather_url(&self, city: &str) -> String {
        format!("{}/weather?city={}", self.base_url, urlencoding::encode(city))
    }

    fn derived_url(&self, endpoint: &str, city: &str, hours: u32) -> String {
        format!(
            "{}/weather/{endpoint}/{}?hours={hours}",
            self.base_url,
            urlencoding::encode(city)
        )
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let start_time = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            DashboardError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("HTTP {} from {}", status, url);
            return Err(DashboardError::http(
                status.as_u16(),
                format!(
                    "{}{}{}",
                    status.canonical_reason().unwrap_or("Unknown error"),
                    if body.is_empty() { "" } else { ": " },
                    body
                ),
            ));
        }

        let bytes = response.bytes().await?;
        let parsed = serde_json::from_slice(&bytes)
            .map_err(|e| DashboardError::decode(format!("Unexpected response from {url}: {e}")))?;

        let total_duration = start_time.elapsed();
        info!(
            "Successful API request in {:.3}s ({} bytes)",
            total_duration.as_secs_f64(),
            bytes.len()
        );
        if total_duration > SLOW_RESPONSE {
            warn!(
                "Slow API response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl WeatherApi for AggregatorClient {
    #[instrument(skip(self))]
    async fn get_weather(&self, city: &str) -> Result<WeatherReading> {
        info!("Getting current weather for '{}'", city);
        self.get_json(&self.weather_url(city)).await
    }

    #[instrument(skip(self))]
    async fn get_history(&self, city: &str, hours: u32) -> Result<Vec<HistoryReading>> {
        let envelope: envelope::History =
            self.get_json(&self.derived_url("history", city, hours)).await?;
        Ok(envelope.history.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_stats(&self, city: &str, hours: u32) -> Result<Option<StatisticsSummary>> {
        let envelope: envelope::Stats =
            self.get_json(&self.derived_url("stats", city, hours)).await?;
        Ok(envelope.statistics)
    }

    #[instrument(skip(self))]
    async fn get_trend(&self, city: &str, hours: u32) -> Result<Option<TrendResult>> {
        let envelope: envelope::Trend =
            self.get_json(&self.derived_url("trend", city, hours)).await?;
        Ok(envelope.trend_analysis)
    }

    #[instrument(skip(self))]
    async fn compare_sources(&self, city: &str, hours: u32) -> Result<SourceComparison> {
        let envelope: envelope::Comparison =
            self.get_json(&self.derived_url("compare", city, hours)).await?;
        Ok(envelope.source_comparison.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_hourly(&self, city: &str, hours: u32) -> Result<Vec<HourlyPoint>> {
        let envelope: envelope::Hourly =
            self.get_json(&self.derived_url("hourly", city, hours)).await?;
        Ok(envelope.hourly_data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> AggregatorClient {
        AggregatorClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: None,
        })
        .unwrap()
    }

    #[test]
    fn test_weather_url_encodes_city() {
        let client = client("https://example.test/");
        assert_eq!(
            client.weather_url("São Paulo"),
            "https://example.test/weather?city=S%C3%A3o%20Paulo"
        );
    }

    #[test]
    fn test_derived_url_layout() {
        let client = client("https://example.test");
        assert_eq!(
            client.derived_url("stats", "Oulu", DEFAULT_LOOKBACK_HOURS),
            "https://example.test/weather/stats/Oulu?hours=24"
        );
        assert_eq!(
            client.derived_url("compare", "Rio/Grande", 6),
            "https://example.test/weather/compare/Rio%2FGrande?hours=6"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client("http://localhost:8000//").base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_envelopes_tolerate_missing_payload() {
        let stats: envelope::Stats = serde_json::from_str(r#"{"city":"Oulu"}"#).unwrap();
        assert!(stats.statistics.is_none());

        let hourly: envelope::Hourly = serde_json::from_str(r#"{"hourly_data":null}"#).unwrap();
        assert!(hourly.hourly_data.is_none());

        let history: envelope::History =
            serde_json::from_str(r#"{"readings":[{"temperature":1.0}]}"#).unwrap();
        assert_eq!(history.history.unwrap().len(), 1);
    }
}
