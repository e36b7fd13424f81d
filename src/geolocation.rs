//! Geolocation capability
//!
//! A provider either reports that it is unavailable, or resolves the current
//! position asynchronously. Providers never retry and impose no timeout of
//! their own beyond the HTTP client's.

use crate::config::GeolocationConfig;
use crate::models::Coordinates;
use crate::{AqiError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Platform facility yielding the device position
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Whether the capability exists at all
    fn is_available(&self) -> bool {
        true
    }

    /// Resolve the current position
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Position known up front, e.g. from configuration or the command line
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// A platform without any geolocation support
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl GeolocationProvider for Unsupported {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates> {
        Err(AqiError::CapabilityUnavailable)
    }
}

/// Estimates the position from the public IP address using an ip-api
/// compatible endpoint
pub struct IpLookup {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLookup {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl GeolocationProvider for IpLookup {
    #[instrument(name = "ip_lookup", skip(self), fields(url = %self.url))]
    async fn current_position(&self) -> Result<Coordinates> {
        debug!("Requesting position from IP lookup service");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AqiError::capability_failed(format!("IP lookup request failed: {e}")))?;

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| AqiError::capability_failed(format!("IP lookup response unreadable: {e}")))?;

        if body.status != "success" {
            return Err(AqiError::permission_denied(
                body.message
                    .unwrap_or_else(|| format!("IP lookup returned status '{}'", body.status)),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                let coordinates = Coordinates::new(lat, lon);
                debug!("IP lookup resolved to {}", coordinates);
                Ok(coordinates)
            }
            _ => Err(AqiError::capability_failed(
                "IP lookup response did not contain coordinates",
            )),
        }
    }
}

/// Build the provider selected in configuration. A `fixed` provider without
/// coordinates behaves like an unsupported platform.
pub fn from_config(config: &GeolocationConfig, client: Client) -> Box<dyn GeolocationProvider> {
    match (config.provider.as_str(), config.latitude, config.longitude) {
        ("fixed", Some(lat), Some(lon)) => Box::new(FixedPosition(Coordinates::new(lat, lon))),
        ("ip", _, _) => Box::new(IpLookup::new(client, config.ip_lookup_url.clone())),
        _ => Box::new(Unsupported),
    }
}
