//! Chart specifications for the dashboard.
//!
//! A [`ChartSpec`] serializes to a Plotly figure (`{"data": [...], "layout": {...}}`)
//! which the page hands to `Plotly.react` unchanged.

use crate::config::PanelConfig;
use crate::store::Series;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

pub const X_AXIS_TITLE: &str = "Horário (São Paulo)";
pub const CHART_HEIGHT: u32 = 350;
pub const PLOT_BACKGROUND: &str = "#34495e";
pub const PAPER_BACKGROUND: &str = "#2c3e50";
pub const FONT_COLOR: &str = "#ecf0f1";
pub const GRID_COLOR: &str = "#555";
pub const MEAN_LINE_COLOR: &str = "white";

/// Display format for x values (display-zone wall clock)
const X_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: String,
    pub name: String,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub height: u32,
    pub hovermode: String,
    pub plot_bgcolor: String,
    pub paper_bgcolor: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    pub gridcolor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: String,
}

impl Layout {
    fn themed(title: &str, axis_label: &str) -> Self {
        Self {
            title: Title {
                text: title.to_string(),
            },
            xaxis: Axis {
                title: Title {
                    text: X_AXIS_TITLE.to_string(),
                },
                gridcolor: GRID_COLOR.to_string(),
            },
            yaxis: Axis {
                title: Title {
                    text: axis_label.to_string(),
                },
                gridcolor: GRID_COLOR.to_string(),
            },
            height: CHART_HEIGHT,
            hovermode: "x unified".to_string(),
            plot_bgcolor: PLOT_BACKGROUND.to_string(),
            paper_bgcolor: PAPER_BACKGROUND.to_string(),
            font: Font {
                color: FONT_COLOR.to_string(),
            },
        }
    }
}

fn format_x(ts: &DateTime<Tz>) -> String {
    ts.format(X_FORMAT).to_string()
}

/// Legend label of the mean line
pub fn mean_label(mean: f64) -> String {
    format!("Média ({:.2})", mean)
}

/// Build the chart for a series.
///
/// An empty series yields a layout-only chart. Otherwise the value trace is
/// overlaid with a dashed mean line from the first to the last timestamp.
pub fn render(series: &Series, title: &str, axis_label: &str, color: &str) -> ChartSpec {
    let layout = Layout::themed(title, axis_label);

    let (first, last, mean) = match (
        series.timestamps().first(),
        series.timestamps().last(),
        series.mean(),
    ) {
        (Some(first), Some(last), Some(mean)) => (first, last, mean),
        _ => {
            return ChartSpec {
                data: Vec::new(),
                layout,
            }
        }
    };

    let values = Trace {
        trace_type: "scatter".to_string(),
        x: series.timestamps().iter().map(format_x).collect(),
        y: series.values().to_vec(),
        mode: "lines+markers".to_string(),
        name: axis_label.to_string(),
        line: Line {
            color: color.to_string(),
            dash: None,
        },
    };

    let mean_line = Trace {
        trace_type: "scatter".to_string(),
        x: vec![format_x(first), format_x(last)],
        y: vec![mean, mean],
        mode: "lines".to_string(),
        name: mean_label(mean),
        line: Line {
            color: MEAN_LINE_COLOR.to_string(),
            dash: Some("dash".to_string()),
        },
    };

    ChartSpec {
        data: vec![values, mean_line],
        layout,
    }
}

/// [`render`] with the title, axis label and colour of a panel
pub fn render_panel(series: &Series, panel: &PanelConfig) -> ChartSpec {
    render(series, &panel.title, &panel.axis_label, &panel.color)
}
