// Configuration (TOML + environment overrides)
pub mod config;

// UTC → display timezone conversion
pub mod timezone;

// STH historical API client
pub mod history;

// Per-attribute series storage
pub mod store;

// Plotly chart specifications
pub mod chart;

// Refresh scheduler and per-attribute pipelines
pub mod pipeline;

// Dashboard HTTP surface
pub mod api;
