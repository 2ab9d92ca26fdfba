// STH historical data access

mod client;

pub use client::{history_url, HistoryClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One historical sample as returned by STH
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// UTC receive time, e.g. `2024-01-15T10:30:00.123Z`
    #[serde(rename = "recvTime")]
    pub recv_time: String,
    /// Raw attribute value; STH may send numbers or numeric strings
    #[serde(rename = "attrValue")]
    pub attr_value: Value,
}

impl Reading {
    pub fn new(recv_time: &str, attr_value: Value) -> Self {
        Self {
            recv_time: recv_time.to_string(),
            attr_value,
        }
    }

    /// Attribute value coerced to a finite float, if it is numeric
    pub fn value(&self) -> Option<f64> {
        let value = match &self.attr_value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Fetch failures. None of these escape [`HistorySource::fetch`].
#[derive(Debug)]
pub enum FetchError {
    /// Network failure or timeout
    Connection(reqwest::Error),
    /// Anything other than 200 OK
    Status(reqwest::StatusCode),
    /// Body is not JSON or lacks the expected nesting
    MalformedResponse(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Connection(e) => write!(f, "Connection error: {}", e),
            FetchError::Status(status) => write!(f, "Unexpected status: {}", status),
            FetchError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of recent readings for a single attribute
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Up to `last_n` most recent readings, or empty on any failure
    async fn fetch(&self, attribute: &str, last_n: usize) -> Vec<Reading>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_from_number() {
        assert_eq!(Reading::new("t", json!(22.5)).value(), Some(22.5));
        assert_eq!(Reading::new("t", json!(40)).value(), Some(40.0));
    }

    #[test]
    fn test_value_from_numeric_string() {
        assert_eq!(Reading::new("t", json!("23.75")).value(), Some(23.75));
        assert_eq!(Reading::new("t", json!(" 61 ")).value(), Some(61.0));
    }

    #[test]
    fn test_value_not_numeric() {
        assert_eq!(Reading::new("t", json!("warm")).value(), None);
        assert_eq!(Reading::new("t", json!(null)).value(), None);
        assert_eq!(Reading::new("t", json!({"v": 1})).value(), None);
    }

    #[test]
    fn test_value_rejects_non_finite_strings() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", "-Infinity"] {
            assert_eq!(Reading::new("t", json!(raw)).value(), None, "{}", raw);
        }
    }

    #[test]
    fn test_reading_deserializes_sth_field_names() {
        let reading: Reading = serde_json::from_value(json!({
            "_id": "65a5080c5b1d5e0012345678",
            "recvTime": "2024-01-15T10:30:00.123Z",
            "attrName": "temperature",
            "attrType": "Number",
            "attrValue": "21.4"
        }))
        .unwrap();

        assert_eq!(reading.recv_time, "2024-01-15T10:30:00.123Z");
        assert_eq!(reading.value(), Some(21.4));
    }
}
