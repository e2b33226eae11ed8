//! Integration tests for the JSON API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use solar_sizer::api::{AppState, router};

fn build_api_state() -> Arc<AppState> {
    Arc::new(AppState {
        estimator: common::reference_estimator(),
    })
}

async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
    let app = router(build_api_state());
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn estimate_returns_design_and_panel() {
    let body = r#"{
        "loads": {"AC 1.5 ton": 1, "Fridge": 1},
        "city": "Pune",
        "outage_hours_per_week": 4,
        "inverter_type": "hybrid",
        "roof_height_m": 20
    }"#;
    let (status, json) = post_json("/estimate", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["city"], "pune");
    assert_eq!(json["design"]["pv_kw"], 3.0);
    assert_eq!(json["design"]["inverter_type"], "hybrid");
    assert_eq!(json["panel"]["wattage_w"], 535);
    assert!(json["design"]["payback_years"].is_number());
}

#[tokio::test]
async fn empty_load_reports_null_payback() {
    let body = r#"{"city":"jaipur","inverter_type":"grid","roof_height_m":5}"#;
    let (status, json) = post_json("/estimate", body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["design"]["payback_years"].is_null());
    assert_eq!(json["design"]["pv_kw"], 0.0);
}

#[tokio::test]
async fn negative_roof_height_returns_400() {
    let body = r#"{"city":"pune","inverter_type":"grid","roof_height_m":-2}"#;
    let (status, json) = post_json("/estimate", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap_or("").contains("roof height"));
}

#[tokio::test]
async fn unknown_inverter_type_is_rejected() {
    let body = r#"{"city":"pune","inverter_type":"diesel","roof_height_m":5}"#;
    let (status, _) = post_json("/estimate", body).await;
    assert!(status.is_client_error());
}
