use super::series::Series;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Latest series held for one attribute
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// Refresh tick that produced the series (0 = never refreshed)
    pub tick: u64,
    pub series: Arc<Series>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoreEntry {
    fn initial() -> Self {
        Self {
            tick: 0,
            series: Arc::new(Series::empty()),
            updated_at: None,
        }
    }
}

/// Per-attribute series store.
///
/// Entries are replaced wholesale, so a reader always sees a complete
/// series from a single refresh.
pub struct SeriesStore {
    entries: DashMap<String, StoreEntry>,
}

impl SeriesStore {
    /// Create a store with an empty entry for each attribute
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = DashMap::new();
        for attribute in attributes {
            entries.insert(attribute.into(), StoreEntry::initial());
        }
        Self { entries }
    }

    /// Replace the series for `attribute` with the result of `tick`.
    ///
    /// Returns false (and keeps the current entry) when the held entry
    /// comes from a later tick.
    pub fn replace(&self, attribute: &str, tick: u64, series: Series) -> bool {
        let entry = StoreEntry {
            tick,
            series: Arc::new(series),
            updated_at: Some(Utc::now()),
        };

        let mut slot = self
            .entries
            .entry(attribute.to_string())
            .or_insert_with(StoreEntry::initial);

        if slot.tick > tick {
            debug!(
                attribute = %attribute,
                held_tick = slot.tick,
                stale_tick = tick,
                "Ignoring stale refresh result"
            );
            return false;
        }

        *slot = entry;
        true
    }

    /// Current entry for `attribute`
    pub fn snapshot(&self, attribute: &str) -> Option<StoreEntry> {
        self.entries.get(attribute).map(|entry| entry.clone())
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.contains_key(attribute)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
