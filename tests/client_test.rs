//! Sensor API client against an in-process stub of the data API.
//!
//! Run with: cargo test --test client_test

mod common;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use chrono::NaiveDate;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sensor_dashboard::api::client::{decode_catalog, decode_history};
use sensor_dashboard::api::{HistoryQuery, NodeId, SensorApi};
use sensor_dashboard::error::{DashboardError, FetchFailure};

#[tokio::test]
async fn catalog_accepts_numeric_and_string_ids() {
    let api = common::client_for(Router::new().route(
        "/api/v1/tagnames",
        get(|| async {
            Json(json!([
                { "nodeid": 7, "tagname": "Boiler Temp" },
                { "nodeid": "n2", "tagname": "Feed Pump" }
            ]))
        }),
    ))
    .await;

    let sensors = api.fetch_catalog().await.expect("catalog");

    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].node_id, NodeId::new("7"));
    assert_eq!(sensors[0].tag_name, "Boiler Temp");
    assert_eq!(sensors[1].node_id, NodeId::new("n2"));
}

#[tokio::test]
async fn catalog_rejects_non_array_body() {
    let api = common::client_for(Router::new().route(
        "/api/v1/tagnames",
        get(|| async { Json(json!({ "detail": "oops" })) }),
    ))
    .await;

    let err = api.fetch_catalog().await.expect_err("object body");

    assert!(matches!(
        err,
        DashboardError::CatalogFetch(FetchFailure::Shape(_))
    ));
}

#[tokio::test]
async fn catalog_reports_http_status() {
    let api = common::client_for(Router::new().route(
        "/api/v1/tagnames",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;

    let err = api.fetch_catalog().await.expect_err("503");

    assert_eq!(err, DashboardError::CatalogFetch(FetchFailure::Status(503)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn history_sends_node_and_optional_bounds() {
    let seen: Arc<Mutex<Vec<HashMap<String, String>>>> = Arc::default();
    let recorder = seen.clone();

    let api = common::client_for(Router::new().route(
        "/api/v1/data",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(params);
                Json(json!([{ "tagname": "Boiler Temp", "history": [] }]))
            }
        }),
    ))
    .await;

    let from = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();

    api.fetch_history(&HistoryQuery {
        node_id: NodeId::new("42"),
        date_from: Some(from),
        date_to: None,
    })
    .await
    .expect("bounded history");

    api.fetch_history(&HistoryQuery {
        node_id: NodeId::new("42"),
        date_from: None,
        date_to: None,
    })
    .await
    .expect("unbounded history");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].get("nodeid").map(String::as_str), Some("42"));
    assert_eq!(
        seen[0].get("date_from").map(String::as_str),
        Some("2024-01-01T08:30:00")
    );
    assert!(!seen[0].contains_key("date_to"));
    assert!(!seen[1].contains_key("date_from"));
}

#[tokio::test]
async fn history_empty_array_is_empty_result() {
    let api = common::client_for(Router::new().route(
        "/api/v1/data",
        get(|| async { Json(json!([])) }),
    ))
    .await;

    let err = api
        .fetch_history(&HistoryQuery {
            node_id: NodeId::new("1"),
            date_from: None,
            date_to: None,
        })
        .await
        .expect_err("empty array");

    assert_eq!(err, DashboardError::EmptyResult);
}

#[tokio::test]
async fn history_reports_http_500() {
    let api = common::client_for(Router::new().route(
        "/api/v1/data",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let err = api
        .fetch_history(&HistoryQuery {
            node_id: NodeId::new("1"),
            date_from: None,
            date_to: None,
        })
        .await
        .expect_err("500");

    assert_eq!(err, DashboardError::HistoryFetch(FetchFailure::Status(500)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn unreachable_api_is_a_transport_failure() {
    // Reserve a port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let config = common::config_for(&format!("http://{addr}/api/v1"));
    let api = sensor_dashboard::api::HttpSensorApi::new(&config).expect("client");

    let err = api.fetch_catalog().await.expect_err("connection refused");

    assert!(matches!(
        err,
        DashboardError::CatalogFetch(FetchFailure::Transport(_))
    ));
}

#[test]
fn decode_history_keeps_only_first_entry() {
    let result = decode_history(json!([
        { "nodeid": 1, "tagname": "first", "history": [{ "time": "2024-01-01T00:00:00", "valint": 3 }] },
        { "nodeid": 2, "tagname": "second", "history": [] }
    ]))
    .expect("history");

    assert_eq!(result.tag_name, "first");
    assert_eq!(result.node_id, Some(NodeId::new("1")));
    assert_eq!(result.history.len(), 1);
}

#[test]
fn decode_history_tolerates_mistyped_values_and_numeric_quality() {
    let result = decode_history(json!([{
        "tagname": "Boiler Temp",
        "history": [
            { "time": "2024-01-01T00:00:00", "valint": "not a number", "quality": 192 },
            { "time": null, "valdouble": 1.5, "recordtype": "raw" }
        ]
    }]))
    .expect("per-record problems must not fail the response");

    assert_eq!(result.history[0].quality.as_deref(), Some("192"));
    assert_eq!(result.history[1].time, None);
    assert_eq!(result.history[1].recordtype.as_deref(), Some("raw"));
}

#[test]
fn decode_history_rejects_non_array() {
    let err = decode_history(json!({ "tagname": "x" })).expect_err("object");
    assert!(matches!(
        err,
        DashboardError::HistoryFetch(FetchFailure::Shape(_))
    ));
}

#[test]
fn decode_catalog_rejects_garbage_entries_as_a_whole() {
    let err = decode_catalog(json!([
        { "nodeid": 1, "tagname": "ok" },
        "garbage"
    ]))
    .expect_err("mixed array");

    assert!(matches!(err, FetchFailure::Shape(_)));
}
