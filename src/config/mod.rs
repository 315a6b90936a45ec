//! Configuration Module - TOML-based Feeder Configuration
//!
//! Loads and validates configuration from `config.toml`. Endpoints,
//! chain identity and source definitions all live here; nothing is
//! hardcoded in the domain layer.

pub mod loader;

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Fee units per whole native token.
pub const FEE_UNITS_PER_TOKEN: i64 = 100_000;

/// Top-level feeder configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the feed loop begins.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Loop timing, retry and logging parameters.
  pub feeder: FeederConfig,
  /// Remote ledger connection.
  pub ledger: LedgerConfig,
  /// Price sources, in reporting order.
  pub sources: Vec<SourceConfig>,
}

/// Feed loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeederConfig {
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Log output format.
  #[serde(default)]
  pub log_format: LogFormat,
  /// Consecutive failed attempts per round before giving up.
  pub max_retry: u32,
  /// Delay between attempts of a failing round (seconds).
  pub retry_interval_secs: u64,
  /// Minimum interval between two feeds (seconds), in [600, 3600).
  pub feed_every_secs: u64,
  /// Tick period of the loop (seconds).
  #[serde(default = "default_tick_interval")]
  pub tick_interval_secs: u64,
  /// Deadline of every network call (seconds).
  #[serde(default = "default_request_timeout")]
  pub request_timeout_secs: u64,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// JSON lines for log aggregation.
  #[default]
  Json,
  /// Human-readable output.
  Pretty,
}

/// Remote ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
  /// Chain identifier included in every feed.
  pub chain_id: String,
  /// Base URL of the ledger node gateway.
  pub node_url: String,
  /// Maximum transaction fee in native tokens (decimal string).
  pub max_tx_fee: String,
}

/// A single REST price source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
  /// Unique source name.
  pub name: String,
  /// HTTP GET endpoint returning JSON.
  pub endpoint: String,
  /// Path to the price inside the JSON document.
  pub json_path: String,
}

impl FeederConfig {
  pub fn retry_interval(&self) -> Duration {
    Duration::from_secs(self.retry_interval_secs)
  }

  pub fn tick_interval(&self) -> Duration {
    Duration::from_secs(self.tick_interval_secs)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  /// Minimum feed interval; `None` if it exceeds the `TimeDelta` range.
  pub fn min_feed_interval(&self) -> Option<chrono::TimeDelta> {
    i64::try_from(self.feed_every_secs)
      .ok()
      .and_then(chrono::TimeDelta::try_seconds)
  }
}

impl LedgerConfig {
  /// Maximum fee converted to integer fee units (truncated).
  ///
  /// Returns `None` if the string is not a decimal or does not fit.
  pub fn max_fee_units(&self) -> Option<u64> {
    use rust_decimal::prelude::ToPrimitive;

    let tokens: Decimal = self.max_tx_fee.trim().parse().ok()?;
    tokens
      .checked_mul(Decimal::from(FEE_UNITS_PER_TOKEN))?
      .trunc()
      .to_u64()
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_tick_interval() -> u64 {
  60
}

fn default_request_timeout() -> u64 {
  10
}
