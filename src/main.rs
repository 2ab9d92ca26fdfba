use anyhow::{Context, Result};
use std::sync::Arc;
use sth_dashboard::api::{create_router, DashboardAppState};
use sth_dashboard::config;
use sth_dashboard::history::{HistoryClient, HistorySource};
use sth_dashboard::pipeline::{run_refresh_scheduler, RefreshSettings};
use sth_dashboard::store::SeriesStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sth_dashboard=info".into()),
        )
        .init();

    info!("STH dashboard starting...");

    let config = config::load_from_env()?;
    let tz = config.dashboard.display_timezone()?;

    info!(
        sth = %config.source.base_url(),
        entity_id = %config.source.entity_id,
        entity_type = %config.source.entity_type,
        timezone = %tz,
        "Using history source"
    );

    let source: Arc<dyn HistorySource> = Arc::new(HistoryClient::new(&config.source)?);

    let attributes: Vec<String> = config.panels.iter().map(|p| p.attribute.clone()).collect();
    let store = Arc::new(SeriesStore::new(attributes.clone()));

    let settings = RefreshSettings {
        last_n: config.dashboard.last_n,
        interval: config.dashboard.refresh_interval(),
        tz,
    };
    tokio::spawn(run_refresh_scheduler(
        source,
        Arc::clone(&store),
        attributes,
        settings,
    ));

    let app = create_router(DashboardAppState {
        store,
        panels: Arc::new(config.panels.clone()),
        refresh_interval_seconds: config.dashboard.refresh_interval_seconds,
    });

    let bind_addr = config.dashboard.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind dashboard on {}", bind_addr))?;
    info!(addr = %bind_addr, "Dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dashboard server error")?;

    info!("STH dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
