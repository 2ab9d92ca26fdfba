use super::DashboardAppState;
use crate::config::PanelConfig;
use axum::{extract::State, response::Html, routing::get, Router};
use std::sync::Arc;

pub const PAGE_TITLE: &str = "Monitoramento do Armazém";

const PAGE_TEMPLATE: &str = include_str!("../../static/dashboard.html");

/// Create router serving the dashboard page
pub fn create_dashboard_router(state: Arc<DashboardAppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .with_state(state)
}

/// GET / - the dashboard page; charts are filled in client-side from /api/charts
async fn dashboard_handler(State(state): State<Arc<DashboardAppState>>) -> Html<String> {
    Html(render_page(&state.panels, state.refresh_interval_seconds))
}

/// Fill the page template with one container per panel
pub fn render_page(panels: &[PanelConfig], refresh_interval_seconds: u64) -> String {
    let containers: String = panels
        .iter()
        .map(|panel| {
            let class = if panel.wide {
                "graph-item-wide"
            } else {
                "graph-item"
            };
            format!(
                r#"        <div class="{}"><div id="{}-graph" class="graph" data-attribute="{}"></div></div>
"#,
                class,
                html_escape(&panel.attribute),
                html_escape(&panel.attribute)
            )
        })
        .collect();

    PAGE_TEMPLATE
        .replace("{{TITLE}}", &html_escape(PAGE_TITLE))
        .replace("{{GRAPHS}}", &containers)
        .replace(
            "{{REFRESH_MS}}",
            &(refresh_interval_seconds.saturating_mul(1000)).to_string(),
        )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
