//! Air-quality service client for the WAQI "feed by geographic point" API
//!
//! One GET per lookup, no retries and no rate limiting. The access token
//! comes from configuration and is redacted from every log line.

use crate::config::ServiceConfig;
use crate::models::{AirQualityReading, Coordinates, Pollutant};
use crate::{AqiError, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Remote source of pollutant readings
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    /// Latest readings for the station nearest to `coordinates`
    async fn feed_by_geo(&self, coordinates: &Coordinates) -> Result<AirQualityReading>;
}

/// Build the shared HTTP client. A timeout of 0 leaves reqwest's default
/// (no timeout) in place.
pub fn build_http_client(timeout_seconds: u32) -> Result<Client> {
    let mut builder =
        Client::builder().user_agent(concat!("aqi-locator/", env!("CARGO_PKG_VERSION")));
    if timeout_seconds > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_seconds.into()));
    }
    builder
        .build()
        .map_err(|e| AqiError::config(format!("Failed to create HTTP client: {e}")))
}

/// WAQI API client
pub struct WaqiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl WaqiClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Create a client from configuration; a token is mandatory
    pub fn from_config(config: &ServiceConfig, client: Client) -> Result<Self> {
        let token = config.token.as_deref().ok_or_else(|| {
            AqiError::config(format!(
                "No service token configured. Set service.token or {}_SERVICE__TOKEN.",
                crate::config::ENV_PREFIX
            ))
        })?;
        Ok(Self::new(client, config.base_url.clone(), token))
    }

    /// `{base}/feed/geo:{lat};{lon}/?token={token}`
    #[must_use]
    pub fn feed_url(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}/feed/{}/?token={}",
            self.base_url,
            coordinates.geo_segment(),
            urlencoding::encode(&self.token)
        )
    }

    fn redact(&self, url: &str) -> String {
        let encoded = urlencoding::encode(&self.token);
        url.replace(encoded.as_ref(), "***")
    }
}

#[async_trait]
impl AirQualitySource for WaqiClient {
    #[instrument(name = "waqi_feed", skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn feed_by_geo(&self, coordinates: &Coordinates) -> Result<AirQualityReading> {
        let url = self.feed_url(coordinates);
        debug!("WAQI request URL: {}", self.redact(&url));
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AqiError::network(self.redact(&e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AqiError::network(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AqiError::network(self.redact(&e.to_string())))?;

        let reading = parse_feed(&body)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved readings for '{}' in {:.3}s",
            reading.city,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow air-quality response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(reading)
    }
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    status: Option<String>,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    aqi: Option<Value>,
    city: FeedCity,
    #[serde(default)]
    iaqi: BTreeMap<String, Value>,
    time: Option<FeedTime>,
}

#[derive(Debug, Deserialize)]
struct FeedCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FeedTime {
    iso: Option<String>,
}

/// Decode a feed response body.
///
/// The whole document is decoded before anything is returned, so a body
/// missing `data.city.name` fails as a unit.
pub fn parse_feed(body: &str) -> Result<AirQualityReading> {
    let envelope: FeedEnvelope = serde_json::from_str(body)?;

    if envelope.status.as_deref() == Some("error") {
        let message = match envelope.data {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(AqiError::service(message));
    }

    let data: FeedData = serde_json::from_value(envelope.data)?;

    let values = data
        .iaqi
        .iter()
        .filter_map(|(key, entry)| {
            let pollutant = Pollutant::from_feed_key(key)?;
            let value = entry.get("v")?.as_f64()?;
            Some((pollutant, value))
        })
        .collect();

    let observed_at = data
        .time
        .and_then(|t| t.iso)
        .and_then(|iso| DateTime::parse_from_rfc3339(&iso).ok());

    Ok(AirQualityReading {
        city: data.city.name,
        values,
        aqi: data.aqi.as_ref().and_then(Value::as_f64),
        observed_at,
    })
}
