//! IP-based geolocation against a local HTTP server

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use aqi_locator::waqi::build_http_client;
use aqi_locator::{
    AirQualityReading, AirQualitySource, AqiError, Coordinates, FieldBatch, GeolocationProvider,
    IpLookup, LocationAirQualityWidget, MemorySink, OutputField, OutputSink, Pollutant,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serve `body` from `/json`, returning the lookup URL
async fn lookup_service(body: Value) -> String {
    let router = Router::new().route(
        "/json",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    format!("{}/json", serve(router).await)
}

fn lookup(url: &str) -> IpLookup {
    IpLookup::new(build_http_client(5).unwrap(), url)
}

#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl AirQualitySource for CountingSource {
    async fn feed_by_geo(&self, _coordinates: &Coordinates) -> aqi_locator::Result<AirQualityReading> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AirQualityReading::new("Unreachable"))
    }
}

#[tokio::test]
async fn resolves_coordinates_from_successful_lookup() {
    let url = lookup_service(json!({
        "status": "success",
        "country": "United States",
        "city": "San Francisco",
        "lat": 37.7749,
        "lon": -122.4194,
        "query": "203.0.113.7"
    }))
    .await;

    let position = lookup(&url).current_position().await.unwrap();

    assert_eq!(position, Coordinates::new(37.7749, -122.4194));
}

#[tokio::test]
async fn failed_status_is_permission_denied_with_service_message() {
    let url = lookup_service(json!({
        "status": "fail",
        "message": "private range",
        "query": "10.0.0.1"
    }))
    .await;

    let err = lookup(&url).current_position().await.unwrap_err();

    assert!(
        matches!(err, AqiError::PermissionDenied { ref message } if message == "private range"),
        "{err:?}"
    );
}

#[tokio::test]
async fn failed_status_without_message_names_the_status() {
    let url = lookup_service(json!({"status": "fail"})).await;

    let err = lookup(&url).current_position().await.unwrap_err();

    assert!(
        matches!(err, AqiError::PermissionDenied { ref message } if message.contains("'fail'")),
        "{err:?}"
    );
}

#[tokio::test]
async fn server_error_status_is_capability_failure() {
    let router = Router::new().route(
        "/json",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let url = format!("{}/json", serve(router).await);

    let err = lookup(&url).current_position().await.unwrap_err();

    assert!(
        matches!(err, AqiError::CapabilityFailed { ref message } if message.contains("500")),
        "{err:?}"
    );
}

#[tokio::test]
async fn success_without_coordinates_is_capability_failure() {
    let url = lookup_service(json!({"status": "success", "city": "Nowhere"})).await;

    let err = lookup(&url).current_position().await.unwrap_err();

    assert!(
        matches!(err, AqiError::CapabilityFailed { ref message } if message.contains("coordinates")),
        "{err:?}"
    );
}

#[tokio::test]
async fn non_json_body_is_capability_failure() {
    let router = Router::new().route("/json", get(|| async { "<html>blocked</html>" }));
    let url = format!("{}/json", serve(router).await);

    let err = lookup(&url).current_position().await.unwrap_err();

    assert!(matches!(err, AqiError::CapabilityFailed { .. }), "{err:?}");
}

#[tokio::test]
async fn denied_lookup_leaves_fields_untouched() {
    let url = lookup_service(json!({"status": "fail", "message": "reserved range"})).await;

    let sink = Arc::new(MemorySink::new());
    let earlier = Pollutant::ALL
        .into_iter()
        .fold(AirQualityReading::new("Before"), |r, p| r.with_value(p, 7.0));
    sink.write_batch(&FieldBatch::from_reading(
        &Coordinates::new(48.1374, 11.5755),
        &earlier,
    ));
    let before = sink.snapshot();

    let source = Arc::new(CountingSource::default());
    let widget = LocationAirQualityWidget::new(Arc::new(lookup(&url)), source.clone(), sink.clone());

    widget.refresh().await;
    let err = widget.try_refresh().await.unwrap_err();

    assert!(matches!(err, AqiError::PermissionDenied { .. }));
    assert_eq!(sink.snapshot(), before);
    assert_eq!(sink.write_count(), 1);
    assert_eq!(sink.get(OutputField::City).as_deref(), Some("Before"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}
