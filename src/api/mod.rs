// Dashboard HTTP surface

pub mod charts;
pub mod dashboard;

pub use charts::create_chart_router;
pub use dashboard::create_dashboard_router;

use crate::config::PanelConfig;
use crate::store::SeriesStore;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for the dashboard handlers
#[derive(Clone)]
pub struct DashboardAppState {
    pub store: Arc<SeriesStore>,
    pub panels: Arc<Vec<PanelConfig>>,
    /// Browser poll interval (seconds)
    pub refresh_interval_seconds: u64,
}

impl DashboardAppState {
    pub fn panel(&self, attribute: &str) -> Option<&PanelConfig> {
        self.panels.iter().find(|p| p.attribute == attribute)
    }
}

/// Complete dashboard router: page, chart API and health check
pub fn create_router(state: DashboardAppState) -> Router {
    let state = Arc::new(state);
    Router::new()
        .merge(create_dashboard_router(Arc::clone(&state)))
        .merge(create_chart_router(state))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
