use super::DashboardConfig;
use std::str::FromStr;

/// Apply environment overrides on top of a loaded config.
///
/// `lookup` returns the raw value for a variable name. Values that fail to
/// parse are ignored and the loaded setting stays in place.
pub fn apply_overrides<F>(config: &mut DashboardConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("STH_HOST") {
        config.source.host = v;
    }
    if let Some(n) = parsed(&lookup, "STH_PORT") {
        config.source.port = n;
    }
    if let Some(v) = lookup("STH_ENTITY_ID") {
        config.source.entity_id = v;
    }
    if let Some(v) = lookup("STH_ENTITY_TYPE") {
        config.source.entity_type = v;
    }
    if let Some(v) = lookup("STH_FIWARE_SERVICE") {
        config.source.fiware_service = v;
    }
    if let Some(v) = lookup("STH_FIWARE_SERVICEPATH") {
        config.source.fiware_servicepath = v;
    }
    if let Some(n) = parsed(&lookup, "STH_TIMEOUT_SECONDS") {
        config.source.timeout_seconds = n;
    }
    if let Some(v) = lookup("DASHBOARD_HOST") {
        config.dashboard.host = v;
    }
    if let Some(n) = parsed(&lookup, "DASHBOARD_PORT") {
        config.dashboard.port = n;
    }
    if let Some(n) = parsed(&lookup, "DASHBOARD_LAST_N") {
        config.dashboard.last_n = n;
    }
    if let Some(n) = parsed(&lookup, "DASHBOARD_REFRESH_INTERVAL_SECONDS") {
        config.dashboard.refresh_interval_seconds = n;
    }
    if let Some(v) = lookup("DASHBOARD_TIMEZONE") {
        config.dashboard.timezone = v;
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).and_then(|v| v.trim().parse::<T>().ok())
}
