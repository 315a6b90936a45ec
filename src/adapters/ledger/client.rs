//! Ledger HTTP Client - JSON REST Gateway of the Remote Ledger
//!
//! Wraps reqwest for all reporter-state queries and feed submission.
//! Performs no retries of its own: a failed call fails the current
//! attempt and the feed loop decides whether to try again.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::LedgerConfig;
use crate::domain::eligibility::Roster;
use crate::domain::round::FeedReceipt;
use crate::ports::ledger::{AccountKeys, LedgerClient, SignedFeed, ValidatorInfo};

/// Configuration for the ledger HTTP client.
#[derive(Debug, Clone)]
pub struct LedgerClientConfig {
  /// Base URL of the node gateway.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
}

impl LedgerClientConfig {
  pub fn from_config(config: &LedgerConfig, timeout: Duration) -> Self {
    Self {
      base_url: config.node_url.trim_end_matches('/').to_string(),
      timeout,
    }
  }
}

/// Last-feed record as returned by the gateway.
#[derive(Debug, Deserialize)]
struct LastFeedResponse {
  /// Unix seconds of the last update.
  update_at: i64,
}

/// Commit result of a submitted transaction.
#[derive(Debug, Deserialize)]
struct CommitResponse {
  height: u64,
  commit_hash: String,
}

/// HTTP client for the ledger node gateway.
pub struct LedgerHttpClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: LedgerClientConfig,
}

impl LedgerHttpClient {
  /// Create a new ledger client.
  pub fn new(config: LedgerClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url, path)
  }

  /// Send a request and require a 2xx status.
  async fn execute(&self, request: RequestBuilder, path: &str) -> Result<Response> {
    let response = request
      .send()
      .await
      .with_context(|| format!("Request to {path} failed"))?;

    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("Ledger API error {status} on {path}: {body}")
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let response = self.execute(self.http.get(self.url(path)), path).await?;
    response
      .json::<T>()
      .await
      .with_context(|| format!("Invalid response body from {path}"))
  }
}

#[async_trait]
impl LedgerClient for LedgerHttpClient {
  #[instrument(skip(self))]
  async fn validator(&self, reporter: &str) -> Result<ValidatorInfo> {
    self.get_json(&format!("/validators/{reporter}")).await
  }

  #[instrument(skip(self))]
  async fn account_keys(&self, reporter: &str) -> Result<AccountKeys> {
    self.get_json(&format!("/accounts/{reporter}")).await
  }

  #[instrument(skip(self))]
  async fn last_feed(&self, reporter: &str) -> Result<Option<DateTime<Utc>>> {
    let path = format!("/price/last_feed/{reporter}");
    let response = self
      .http
      .get(self.url(&path))
      .send()
      .await
      .with_context(|| format!("Request to {path} failed"))?;

    if response.status() == StatusCode::NOT_FOUND {
      debug!(reporter, "No previous feed recorded");
      return Ok(None);
    }
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      anyhow::bail!("Ledger API error {status} on {path}: {body}");
    }

    let last: LastFeedResponse = response
      .json()
      .await
      .with_context(|| format!("Invalid response body from {path}"))?;
    unix_to_utc(last.update_at).map(Some)
  }

  #[instrument(skip(self))]
  async fn roster(&self) -> Result<Roster> {
    self.get_json("/validators").await
  }

  #[instrument(skip(self, feed), fields(reporter = %feed.payload.reporter, price = %feed.payload.price))]
  async fn submit_feed(&self, feed: &SignedFeed) -> Result<FeedReceipt> {
    let path = "/price/feed";
    let request = self.http.post(self.url(path)).json(feed);
    let commit: CommitResponse = self
      .execute(request, path)
      .await?
      .json()
      .await
      .context("Invalid commit response")?;

    Ok(FeedReceipt {
      height: commit.height,
      commit_hash: commit.commit_hash,
    })
  }
}

fn unix_to_utc(secs: i64) -> Result<DateTime<Utc>> {
  Utc
    .timestamp_opt(secs, 0)
    .single()
    .with_context(|| format!("Invalid feed timestamp {secs}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_base_url_trailing_slash_trimmed() {
    let config = LedgerClientConfig::from_config(
      &LedgerConfig {
        chain_id: "c".into(),
        node_url: "http://node:8080/".into(),
        max_tx_fee: "1".into(),
      },
      Duration::from_secs(1),
    );
    let client = LedgerHttpClient::new(config).unwrap();
    assert_eq!(client.url("/validators"), "http://node:8080/validators");
  }

  #[test]
  fn test_response_shapes() {
    let v: ValidatorInfo =
      serde_json::from_str(r#"{"username":"alice","has_revoked":true}"#).unwrap();
    assert!(v.revoked);

    let r: Roster = serde_json::from_str(r#"{"oncall":["a"],"standby":[]}"#).unwrap();
    assert!(r.is_eligible("a"));

    let last: LastFeedResponse = serde_json::from_str(r#"{"update_at":1700000000}"#).unwrap();
    assert_eq!(unix_to_utc(last.update_at).unwrap().timestamp(), 1_700_000_000);
  }
}
