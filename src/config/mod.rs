pub mod env;
pub mod panel;

pub use panel::{default_panels, PanelConfig};

use anyhow::{anyhow, bail, Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Env var naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "STH_DASHBOARD_CONFIG";

/// Config file picked up when no explicit path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

/// Complete dashboard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub dashboard: ServerConfig,
    #[serde(default = "default_panels")]
    pub panels: Vec<PanelConfig>,
}

/// Remote STH historical API
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_host")]
    pub host: String,
    #[serde(default = "default_source_port")]
    pub port: u16,
    #[serde(default = "default_entity_id")]
    pub entity_id: String,
    #[serde(default = "default_entity_type")]
    pub entity_type: String,
    /// Value of the `fiware-service` header
    #[serde(default = "default_fiware_service")]
    pub fiware_service: String,
    /// Value of the `fiware-servicepath` header
    #[serde(default = "default_fiware_servicepath")]
    pub fiware_servicepath: String,
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_source_host() -> String {
    "20.151.77.156".to_string()
}

fn default_source_port() -> u16 {
    8666
}

fn default_entity_id() -> String {
    "urn:ngsi-ld:RoomMonitor:101".to_string()
}

fn default_entity_type() -> String {
    "RoomMonitor".to_string()
}

fn default_fiware_service() -> String {
    "smart".to_string()
}

fn default_fiware_servicepath() -> String {
    "/".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: default_source_host(),
            port: default_source_port(),
            entity_id: default_entity_id(),
            entity_type: default_entity_type(),
            fiware_service: default_fiware_service(),
            fiware_servicepath: default_fiware_servicepath(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl SourceConfig {
    /// Base URL of the STH service, without trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Dashboard web server and refresh loop
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_host")]
    pub host: String,
    #[serde(default = "default_bind_port")]
    pub port: u16,
    /// Records requested per fetch (lastN window)
    #[serde(default = "default_last_n")]
    pub last_n: usize,
    /// Seconds between refresh ticks
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// IANA name of the zone timestamps are displayed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

fn default_last_n() -> usize {
    50
}

fn default_refresh_interval() -> u64 {
    10
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_bind_host(),
            port: default_bind_port(),
            last_n: default_last_n(),
            refresh_interval_seconds: default_refresh_interval(),
            timezone: default_timezone(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    /// Resolve the configured display timezone
    pub fn display_timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid display timezone '{}': {}", self.timezone, e))
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            dashboard: ServerConfig::default(),
            panels: default_panels(),
        }
    }
}

impl DashboardConfig {
    /// Reject settings the refresh loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.dashboard.refresh_interval_seconds == 0 {
            bail!("dashboard.refresh_interval_seconds must be greater than zero");
        }
        if self.dashboard.last_n == 0 {
            bail!("dashboard.last_n must be greater than zero");
        }
        if self.source.timeout_seconds == 0 {
            bail!("source.timeout_seconds must be greater than zero");
        }
        self.dashboard.display_timezone()?;

        if self.panels.is_empty() {
            bail!("at least one panel must be configured");
        }
        let mut seen = HashSet::new();
        for panel in &self.panels {
            if panel.attribute.trim().is_empty() {
                bail!("panel attribute names cannot be empty");
            }
            if !seen.insert(panel.attribute.as_str()) {
                bail!("duplicate panel for attribute '{}'", panel.attribute);
            }
        }
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DashboardConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: DashboardConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Resolve configuration for the running process.
///
/// An explicit `STH_DASHBOARD_CONFIG` path must load; the default path is
/// optional. Environment overrides are applied last, then the result is
/// validated.
pub fn load_from_env() -> Result<DashboardConfig> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            let config = load_config(&path)?;
            info!(path = %path, "Loaded dashboard config");
            config
        }
        Err(_) => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                let config = load_config(&default_path)?;
                info!(path = %default_path.display(), "Loaded dashboard config");
                config
            } else {
                warn!("No config file found, using defaults");
                DashboardConfig::default()
            }
        }
    };

    env::apply_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
