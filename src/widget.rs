//! Location air-quality widget
//!
//! Ties the three collaborators together: position from the geolocation
//! capability, readings from the air-quality source, and a single batch
//! write into the output sink. Any failure stops the flow before the sink
//! is touched.

use crate::geolocation::GeolocationProvider;
use crate::models::{AirQualityReading, Coordinates, FieldBatch};
use crate::sink::OutputSink;
use crate::waqi::AirQualitySource;
use crate::{AqiError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, debug, error, info, info_span};

/// Everything one successful lookup produced
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub coordinates: Coordinates,
    pub reading: AirQualityReading,
    /// Exactly what the sink received
    pub batch: FieldBatch,
}

/// Emit the single diagnostic for a failed lookup, detail included.
pub fn log_failure(error: &AqiError) {
    if error.is_geolocation() {
        error!("{}", error);
    } else {
        error!("Error fetching air quality data: {}", error);
    }
}

pub struct LocationAirQualityWidget {
    geolocation: Arc<dyn GeolocationProvider>,
    source: Arc<dyn AirQualitySource>,
    sink: Arc<dyn OutputSink>,
    invocations: AtomicU64,
}

impl LocationAirQualityWidget {
    pub fn new(
        geolocation: Arc<dyn GeolocationProvider>,
        source: Arc<dyn AirQualitySource>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            geolocation,
            source,
            sink,
            invocations: AtomicU64::new(0),
        }
    }

    /// Look up the current location's readings and populate the sink.
    ///
    /// Errors are reported through `tracing` only and never reach the caller.
    pub async fn refresh(&self) {
        if let Err(e) = self.try_refresh().await {
            log_failure(&e);
        }
    }

    /// Same flow as [`refresh`](Self::refresh), returning the outcome
    /// instead of logging failures.
    pub async fn try_refresh(&self) -> Result<RefreshOutcome> {
        let invocation = self.invocations.fetch_add(1, Ordering::Relaxed) + 1;
        self.run()
            .instrument(info_span!("refresh", invocation))
            .await
    }

    async fn run(&self) -> Result<RefreshOutcome> {
        if !self.geolocation.is_available() {
            return Err(AqiError::CapabilityUnavailable);
        }

        let coordinates = self.geolocation.current_position().await?;
        debug!("Position acquired: {}", coordinates);

        let reading = self.source.feed_by_geo(&coordinates).await?;

        let batch = FieldBatch::from_reading(&coordinates, &reading);
        self.sink.write_batch(&batch);
        info!(
            city = %reading.city,
            pollutants = reading.values.len(),
            "Output fields updated"
        );

        Ok(RefreshOutcome {
            coordinates,
            reading,
            batch,
        })
    }
}
