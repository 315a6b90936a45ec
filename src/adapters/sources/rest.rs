//! REST Price Source - HTTP GET + JSON Path Extraction
//!
//! Each configured source is one GET endpoint returning a JSON
//! document. The value at `json_path` must be a JSON string or number
//! and is converted with the fixed-point rules in `domain::price`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::SourceConfig;
use crate::domain::error::{SourceError, SourceFailure};
use crate::domain::price::Price;
use crate::ports::price_source::PriceSource;

use super::json_path;

/// Price source backed by a REST endpoint.
pub struct RestPriceSource {
    /// Shared HTTP client (connection pool).
    http: Client,
    /// Name, endpoint and path from config.
    config: SourceConfig,
}

impl RestPriceSource {
    /// Create a source using an existing HTTP client.
    pub fn new(http: Client, config: SourceConfig) -> Self {
        Self { http, config }
    }

    /// Build one source per configured entry, sharing a single client.
    pub fn from_configs(configs: &[SourceConfig], timeout: Duration) -> Result<Vec<Self>> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(configs
            .iter()
            .cloned()
            .map(|c| Self::new(http.clone(), c))
            .collect())
    }

    fn fail(&self, cause: SourceFailure) -> SourceError {
        SourceError::new(&self.config.name, cause)
    }

    /// Extract and convert the price from a response body.
    fn parse_body(&self, body: &str) -> Result<Price, SourceError> {
        let doc: Value = serde_json::from_str(body)
            .map_err(|e| self.fail(SourceFailure::InvalidJson(e.to_string())))?;

        let value = json_path::lookup(&doc, &self.config.json_path)
            .ok_or_else(|| self.fail(SourceFailure::MissingValue(self.config.json_path.clone())))?;

        Price::from_json(value).map_err(|e| self.fail(e.into()))
    }
}

#[async_trait]
impl PriceSource for RestPriceSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    #[instrument(skip(self), fields(source = %self.config.name))]
    async fn fetch_price(&self) -> Result<Price, SourceError> {
        let response = self
            .http
            .get(&self.config.endpoint)
            .send()
            .await
            .map_err(|e| self.fail(SourceFailure::Http(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.fail(SourceFailure::Status(status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.fail(SourceFailure::Http(e.to_string())))?;

        let price = self.parse_body(&body)?;
        debug!(price = %price, "Source price fetched");
        Ok(price)
    }
}
