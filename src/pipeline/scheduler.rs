use super::{refresh_attribute, RefreshSettings};
use crate::history::HistorySource;
use crate::store::SeriesStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Spawn one independent refresh task per attribute for `tick`.
///
/// A slow fetch only holds up its own task.
pub fn spawn_tick(
    source: &Arc<dyn HistorySource>,
    store: &Arc<SeriesStore>,
    attributes: &[String],
    tick: u64,
    settings: RefreshSettings,
) -> Vec<JoinHandle<()>> {
    attributes
        .iter()
        .map(|attribute| {
            let source = Arc::clone(source);
            let store = Arc::clone(store);
            let attribute = attribute.clone();
            tokio::spawn(async move {
                refresh_attribute(source.as_ref(), &store, &attribute, tick, &settings).await;
            })
        })
        .collect()
}

/// Drive the refresh pipelines on a fixed interval.
///
/// The first tick fires immediately. Earlier ticks are not awaited: if a
/// fetch outlives the interval the next one is issued anyway, and the store
/// drops whichever result arrives out of order.
pub async fn run_refresh_scheduler(
    source: Arc<dyn HistorySource>,
    store: Arc<SeriesStore>,
    attributes: Vec<String>,
    settings: RefreshSettings,
) {
    let mut ticker = interval(settings.interval);

    // Skip missed ticks to prevent a burst after a stall
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        attributes = ?attributes,
        interval_seconds = settings.interval.as_secs_f64(),
        last_n = settings.last_n,
        "Refresh scheduler started"
    );

    let mut tick: u64 = 0;
    loop {
        ticker.tick().await;
        tick += 1;
        spawn_tick(&source, &store, &attributes, tick, settings);
    }
}
