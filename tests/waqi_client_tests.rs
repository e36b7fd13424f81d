//! WAQI client against a local HTTP server

use std::collections::HashMap;
use std::sync::Arc;

use aqi_locator::waqi::build_http_client;
use aqi_locator::{
    AirQualitySource, AqiError, Coordinates, FixedPosition, LocationAirQualityWidget,
    MemorySink, OutputField, Pollutant, WaqiClient,
};
use axum::extract::{Path, Query};
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

async fn feed(
    Path(geo): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if query.get("token").map(String::as_str) != Some("demo") {
        return Json(json!({"status": "error", "data": "Invalid key"}));
    }
    if geo != "geo:37.7749;-122.4194" {
        return Json(json!({"status": "error", "data": format!("unexpected {geo}")}));
    }
    Json(json!({
        "status": "ok",
        "data": {
            "aqi": 57,
            "city": {"name": "San Francisco"},
            "iaqi": {"pm25": {"v": 42}, "o3": {"v": 18}, "t": {"v": 14.2}}
        }
    }))
}

fn waqi_router() -> Router {
    Router::new().route("/feed/{geo}/", get(feed))
}

fn client(base_url: &str, token: &str) -> WaqiClient {
    WaqiClient::new(build_http_client(5).unwrap(), base_url, token)
}

fn san_francisco() -> Coordinates {
    Coordinates::new(37.7749, -122.4194)
}

#[tokio::test]
async fn fetches_and_decodes_feed() {
    let base = serve(waqi_router()).await;

    let reading = client(&base, "demo")
        .feed_by_geo(&san_francisco())
        .await
        .unwrap();

    assert_eq!(reading.city, "San Francisco");
    assert_eq!(reading.value(Pollutant::Pm25), Some(42.0));
    assert_eq!(reading.value(Pollutant::O3), Some(18.0));
    assert_eq!(reading.values.len(), 2);
    assert_eq!(reading.aqi, Some(57.0));
}

#[tokio::test]
async fn invalid_token_is_a_service_error() {
    let base = serve(waqi_router()).await;

    let err = client(&base, "wrong")
        .feed_by_geo(&san_francisco())
        .await
        .unwrap_err();

    assert!(matches!(err, AqiError::Service { ref message } if message == "Invalid key"));
}

#[tokio::test]
async fn server_error_status_is_a_network_error() {
    let router = Router::new().route(
        "/feed/{geo}/",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = serve(router).await;

    let err = client(&base, "demo")
        .feed_by_geo(&san_francisco())
        .await
        .unwrap_err();

    assert!(matches!(err, AqiError::Network { ref message } if message.contains("502")));
}

#[tokio::test]
async fn non_json_body_is_a_parse_error() {
    let router = Router::new().route("/feed/{geo}/", get(|| async { "<html>maintenance</html>" }));
    let base = serve(router).await;

    let err = client(&base, "demo")
        .feed_by_geo(&san_francisco())
        .await
        .unwrap_err();

    assert!(matches!(err, AqiError::Parse { .. }));
}

#[tokio::test]
async fn unreachable_service_does_not_leak_token() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), "topsecret")
        .feed_by_geo(&san_francisco())
        .await
        .unwrap_err();

    assert!(matches!(err, AqiError::Network { .. }));
    assert!(!err.to_string().contains("topsecret"));
}

#[tokio::test]
async fn widget_end_to_end_against_local_service() {
    let base = serve(waqi_router()).await;
    let sink = Arc::new(MemorySink::new());
    let widget = LocationAirQualityWidget::new(
        Arc::new(FixedPosition(san_francisco())),
        Arc::new(client(&base, "demo")),
        sink.clone(),
    );

    widget.refresh().await;

    assert_eq!(sink.get(OutputField::City).as_deref(), Some("San Francisco"));
    assert_eq!(sink.get(OutputField::Latitude).as_deref(), Some("37.774900"));
    assert_eq!(
        sink.get(OutputField::Pollutant(Pollutant::No2)).as_deref(),
        Some("")
    );
}
