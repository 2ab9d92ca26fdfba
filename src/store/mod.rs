// Per-attribute series storage

mod series;
mod series_store;

pub use series::Series;
pub use series_store::{SeriesStore, StoreEntry};
