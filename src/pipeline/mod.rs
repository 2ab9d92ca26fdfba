// Fetch → convert → store refresh loop

mod scheduler;

pub use scheduler::{run_refresh_scheduler, spawn_tick};

use crate::history::HistorySource;
use crate::store::{Series, SeriesStore};
use chrono_tz::Tz;
use std::time::Duration;
use tracing::debug;

/// Settings shared by every attribute pipeline
#[derive(Debug, Clone, Copy)]
pub struct RefreshSettings {
    /// Records requested per fetch
    pub last_n: usize,
    /// Time between ticks
    pub interval: Duration,
    /// Display timezone
    pub tz: Tz,
}

/// Fetch the latest window for `attribute` and convert it to a series.
///
/// Fetch failures arrive here as an empty list and produce an empty series.
pub async fn refresh<S>(source: &S, attribute: &str, last_n: usize, tz: Tz) -> Series
where
    S: HistorySource + ?Sized,
{
    let readings = source.fetch(attribute, last_n).await;
    if readings.is_empty() {
        return Series::empty();
    }
    Series::from_readings(attribute, &readings, tz)
}

/// Refresh one attribute and store the result under `tick`
pub async fn refresh_attribute<S>(
    source: &S,
    store: &SeriesStore,
    attribute: &str,
    tick: u64,
    settings: &RefreshSettings,
) -> bool
where
    S: HistorySource + ?Sized,
{
    let series = refresh(source, attribute, settings.last_n, settings.tz).await;
    let points = series.len();
    let stored = store.replace(attribute, tick, series);
    debug!(attribute = %attribute, tick, points, stored, "Refreshed attribute");
    stored
}
