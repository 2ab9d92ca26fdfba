use super::{FetchError, HistorySource, Reading};
use crate::config::SourceConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// JSON pointer to the readings inside an STH response
const VALUES_POINTER: &str = "/contextResponses/0/contextElement/attributes/0/values";

/// HTTP client for the STH historical API.
///
/// Every request targets the single configured entity and carries the
/// fiware service headers.
pub struct HistoryClient {
    http_client: Client,
    base_url: String,
    entity_type: String,
    entity_id: String,
    fiware_service: String,
    fiware_servicepath: String,
}

/// Build the lastN query URL for one attribute
pub fn history_url(
    base_url: &str,
    entity_type: &str,
    entity_id: &str,
    attribute: &str,
    last_n: usize,
) -> String {
    format!(
        "{}/STH/v1/contextEntities/type/{}/id/{}/attributes/{}?lastN={}",
        base_url, entity_type, entity_id, attribute, last_n
    )
}

impl HistoryClient {
    /// Create a client for the configured STH host.
    pub fn new(source: &SourceConfig) -> Result<Self> {
        Self::with_base_url(source, source.base_url())
    }

    /// Create a client with a custom base URL (for testing with a mock server).
    pub fn with_base_url(source: &SourceConfig, base_url: String) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(source.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            base_url,
            entity_type: source.entity_type.clone(),
            entity_id: source.entity_id.clone(),
            fiware_service: source.fiware_service.clone(),
            fiware_servicepath: source.fiware_servicepath.clone(),
        })
    }

    pub fn url_for(&self, attribute: &str, last_n: usize) -> String {
        history_url(
            &self.base_url,
            &self.entity_type,
            &self.entity_id,
            attribute,
            last_n,
        )
    }

    /// Fetch the `last_n` most recent readings for `attribute`.
    pub async fn fetch_readings(
        &self,
        attribute: &str,
        last_n: usize,
    ) -> Result<Vec<Reading>, FetchError> {
        let url = self.url_for(attribute, last_n);
        let response = self
            .http_client
            .get(&url)
            .header("fiware-service", self.fiware_service.as_str())
            .header("fiware-servicepath", self.fiware_servicepath.as_str())
            .send()
            .await
            .map_err(FetchError::Connection)?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await.map_err(FetchError::Connection)?;
        extract_readings(attribute, &body)
    }
}

/// Pull the readings list out of an STH response body.
///
/// A missing or non-list `values` fails the whole response; a single record
/// without a string `recvTime` or without `attrValue` is dropped and logged.
fn extract_readings(attribute: &str, body: &str) -> Result<Vec<Reading>, FetchError> {
    let mut json: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let values = json
        .pointer_mut(VALUES_POINTER)
        .map(Value::take)
        .ok_or_else(|| FetchError::MalformedResponse(format!("missing {}", VALUES_POINTER)))?;

    let records = match values {
        Value::Array(records) => records,
        other => {
            return Err(FetchError::MalformedResponse(format!(
                "expected a list of readings, got {}",
                other
            )))
        }
    };

    Ok(records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Reading>(record.clone()) {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!(
                    attribute = %attribute,
                    record = %record,
                    error = %e,
                    "Dropping malformed reading"
                );
                None
            }
        })
        .collect())
}

#[async_trait]
impl HistorySource for HistoryClient {
    async fn fetch(&self, attribute: &str, last_n: usize) -> Vec<Reading> {
        match self.fetch_readings(attribute, last_n).await {
            Ok(readings) => {
                debug!(attribute = %attribute, count = readings.len(), "Fetched readings");
                readings
            }
            Err(e) => {
                warn!(
                    attribute = %attribute,
                    url = %self.url_for(attribute, last_n),
                    error = %e,
                    "Failed to fetch history, substituting empty result"
                );
                Vec::new()
            }
        }
    }
}
