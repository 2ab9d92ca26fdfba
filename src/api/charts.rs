use super::DashboardAppState;
use crate::chart::{render_panel, ChartSpec};
use crate::config::PanelConfig;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

/// One rendered panel
#[derive(Serialize)]
pub struct PanelChart {
    pub attribute: String,
    pub wide: bool,
    /// Refresh tick the figure was rendered from
    pub tick: u64,
    pub figure: ChartSpec,
}

/// Raw stored series for one attribute
#[derive(Serialize)]
pub struct SeriesResponse {
    pub attribute: String,
    pub tick: u64,
    pub updated_at: Option<DateTime<Utc>>,
    /// RFC 3339 with display-zone offset
    pub timestamps: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn unknown_attribute(attribute: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("unknown attribute '{}'", attribute),
        }),
    )
        .into_response()
}

/// Create chart API router
pub fn create_chart_router(state: Arc<DashboardAppState>) -> Router {
    Router::new()
        .route("/api/charts", get(get_charts))
        .route("/api/charts/:attribute", get(get_chart))
        .route("/api/series/:attribute", get(get_series))
        .with_state(state)
}

fn panel_chart(state: &DashboardAppState, panel: &PanelConfig) -> Option<PanelChart> {
    let entry = state.store.snapshot(&panel.attribute)?;
    Some(PanelChart {
        attribute: panel.attribute.clone(),
        wide: panel.wide,
        tick: entry.tick,
        figure: render_panel(&entry.series, panel),
    })
}

/// GET /api/charts - every panel, in configured order
async fn get_charts(State(state): State<Arc<DashboardAppState>>) -> Json<Vec<PanelChart>> {
    let charts = state
        .panels
        .iter()
        .filter_map(|panel| panel_chart(&state, panel))
        .collect();
    Json(charts)
}

/// GET /api/charts/:attribute - one panel's figure
async fn get_chart(
    State(state): State<Arc<DashboardAppState>>,
    Path(attribute): Path<String>,
) -> Response {
    match state
        .panel(&attribute)
        .and_then(|panel| panel_chart(&state, panel))
    {
        Some(chart) => Json(chart).into_response(),
        None => unknown_attribute(&attribute),
    }
}

/// GET /api/series/:attribute - stored series without rendering
async fn get_series(
    State(state): State<Arc<DashboardAppState>>,
    Path(attribute): Path<String>,
) -> Response {
    if state.panel(&attribute).is_none() {
        return unknown_attribute(&attribute);
    }
    let entry = match state.store.snapshot(&attribute) {
        Some(entry) => entry,
        None => return unknown_attribute(&attribute),
    };

    Json(SeriesResponse {
        attribute,
        tick: entry.tick,
        updated_at: entry.updated_at,
        timestamps: entry
            .series
            .timestamps()
            .iter()
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            .collect(),
        values: entry.series.values().to_vec(),
    })
    .into_response()
}
