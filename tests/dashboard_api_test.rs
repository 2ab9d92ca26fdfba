// Integration tests for the dashboard HTTP surface

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;
use std::sync::Arc;
use sth_dashboard::api::{create_router, DashboardAppState};
use sth_dashboard::config::default_panels;
use sth_dashboard::store::{Series, SeriesStore};
use tower::ServiceExt;

fn create_test_store() -> Arc<SeriesStore> {
    Arc::new(SeriesStore::new(
        default_panels().into_iter().map(|p| p.attribute),
    ))
}

fn create_test_app(store: Arc<SeriesStore>) -> Router {
    create_router(DashboardAppState {
        store,
        panels: Arc::new(default_panels()),
        refresh_interval_seconds: 10,
    })
}

fn series_of(values: &[f64]) -> Series {
    Series::from_points(values.iter().enumerate().map(|(i, v)| {
        let ts = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 30, i as u32)
            .unwrap()
            .with_timezone(&Sao_Paulo);
        (ts, *v)
    }))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// GET / serves the page with the three chart containers.
#[tokio::test]
async fn test_dashboard_page() {
    let app = create_test_app(create_test_store());

    let (status, body) = get(app, "/").await;
    let page = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Monitoramento do Armazém"));
    assert!(page.contains("temperature-graph"));
    assert!(page.contains("humidity-graph"));
    assert!(page.contains("luminosity-graph"));
    assert!(page.contains("const REFRESH_MS = 10000;"));
}

/// GET /api/charts before any refresh returns empty-state charts.
#[tokio::test]
async fn test_charts_before_first_refresh() {
    let app = create_test_app(create_test_store());

    let (status, charts) = get_json(app, "/api/charts").await;

    assert_eq!(status, StatusCode::OK);
    let charts = charts.as_array().unwrap();
    assert_eq!(charts.len(), 3);
    assert_eq!(charts[0]["attribute"], "temperature");
    assert_eq!(charts[0]["wide"], true);
    assert_eq!(charts[1]["attribute"], "humidity");
    assert_eq!(charts[2]["attribute"], "luminosity");
    for chart in charts {
        assert_eq!(chart["tick"], 0);
        assert_eq!(chart["figure"]["data"].as_array().unwrap().len(), 0);
        assert_eq!(chart["figure"]["layout"]["height"], 350);
    }
}

/// GET /api/charts/:attribute renders the stored series with its mean line.
#[tokio::test]
async fn test_chart_for_attribute() {
    let store = create_test_store();
    store.replace("humidity", 3, series_of(&[10.0, 20.0, 30.0]));
    let app = create_test_app(store);

    let (status, chart) = get_json(app, "/api/charts/humidity").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["tick"], 3);
    let data = chart["figure"]["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "Umidade (%)");
    assert_eq!(data[0]["line"]["color"], "#3498db");
    assert_eq!(data[0]["y"], serde_json::json!([10.0, 20.0, 30.0]));
    assert_eq!(data[1]["name"], "Média (20.00)");
    assert_eq!(data[1]["y"], serde_json::json!([20.0, 20.0]));
    assert_eq!(chart["figure"]["layout"]["title"]["text"], "Humidity");
}

/// Unknown attributes are 404 on both chart and series endpoints.
#[tokio::test]
async fn test_unknown_attribute_returns_404() {
    let store = create_test_store();

    let (status, body) = get_json(create_test_app(store.clone()), "/api/charts/pressure").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("pressure"));

    let (status, _) = get_json(create_test_app(store), "/api/series/pressure").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// GET /api/series/:attribute exposes the raw zoned series.
#[tokio::test]
async fn test_series_endpoint() {
    let store = create_test_store();
    store.replace("temperature", 1, series_of(&[21.5, 22.0]));
    let app = create_test_app(store);

    let (status, series) = get_json(app, "/api/series/temperature").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(series["attribute"], "temperature");
    assert_eq!(series["tick"], 1);
    assert!(series["updated_at"].is_string());
    assert_eq!(
        series["timestamps"],
        serde_json::json!(["2024-01-15T07:30:00.000-03:00", "2024-01-15T07:30:01.000-03:00"])
    );
    assert_eq!(series["values"], serde_json::json!([21.5, 22.0]));
}

/// GET /health
#[tokio::test]
async fn test_health() {
    let app = create_test_app(create_test_store());

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
