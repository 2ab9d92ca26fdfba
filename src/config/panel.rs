use serde::{Deserialize, Serialize};

/// One chart on the dashboard, bound to a single entity attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Attribute name as known to the history service
    pub attribute: String,
    /// Chart title
    pub title: String,
    /// Y axis title; also names the value trace
    pub axis_label: String,
    /// CSS colour of the value trace
    pub color: String,
    /// Spans the full dashboard width
    #[serde(default)]
    pub wide: bool,
}

impl PanelConfig {
    pub fn new(attribute: &str, title: &str, axis_label: &str, color: &str, wide: bool) -> Self {
        Self {
            attribute: attribute.to_string(),
            title: title.to_string(),
            axis_label: axis_label.to_string(),
            color: color.to_string(),
            wide,
        }
    }
}

/// Temperature, humidity and luminosity panels
pub fn default_panels() -> Vec<PanelConfig> {
    vec![
        PanelConfig::new("temperature", "Temperature", "Temperatura (°C)", "#e74c3c", true),
        PanelConfig::new("humidity", "Humidity", "Umidade (%)", "#3498db", false),
        PanelConfig::new("luminosity", "Luminosity", "Luminosidade (%)", "#2ecc71", false),
    ]
}
