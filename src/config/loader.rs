//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::AppConfig;

/// Accepted range of `feed_every_secs`: [10 minutes, 1 hour).
pub const FEED_INTERVAL_RANGE: std::ops::Range<u64> = 600..3600;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Feed interval inside [600, 3600) seconds
/// - A usable retry budget and positive timings
/// - A positive, convertible transaction fee
/// - Non-empty, uniquely named, well-formed sources
pub fn validate_config(config: &AppConfig) -> Result<()> {
  let feeder = &config.feeder;

  anyhow::ensure!(
    FEED_INTERVAL_RANGE.contains(&feeder.feed_every_secs),
    "Invalid feed_every_secs: {}, valid: [10 minutes, 1 hour)",
    feeder.feed_every_secs
  );
  anyhow::ensure!(
    feeder.max_retry >= 1,
    "max_retry must be at least 1, got {}",
    feeder.max_retry
  );
  anyhow::ensure!(
    feeder.tick_interval_secs > 0,
    "tick_interval_secs must be positive"
  );
  anyhow::ensure!(
    feeder.request_timeout_secs > 0,
    "request_timeout_secs must be positive"
  );

  // Ledger validation
  let ledger = &config.ledger;
  anyhow::ensure!(!ledger.chain_id.is_empty(), "chain_id must not be empty");
  anyhow::ensure!(
    is_http_url(&ledger.node_url),
    "node_url must be an http(s) URL, got {:?}",
    ledger.node_url
  );
  let fee = ledger
    .max_fee_units()
    .with_context(|| format!("Invalid max_tx_fee: {:?}", ledger.max_tx_fee))?;
  anyhow::ensure!(
    fee > 0,
    "max_tx_fee must be positive, got {:?}",
    ledger.max_tx_fee
  );

  // Source validation
  anyhow::ensure!(
    !config.sources.is_empty(),
    "At least one price source must be configured"
  );

  let mut names = HashSet::new();
  for (i, source) in config.sources.iter().enumerate() {
    anyhow::ensure!(!source.name.is_empty(), "Source {i} has an empty name");
    anyhow::ensure!(
      names.insert(source.name.as_str()),
      "Duplicate source name: {}",
      source.name
    );
    anyhow::ensure!(
      is_http_url(&source.endpoint),
      "Source {} endpoint must be an http(s) URL, got {:?}",
      source.name,
      source.endpoint
    );
    anyhow::ensure!(
      !source.json_path.is_empty(),
      "Source {} has an empty json_path",
      source.name
    );
  }

  Ok(())
}

fn is_http_url(url: &str) -> bool {
  reqwest::Url::parse(url)
    .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;
  use crate::config::LogFormat;

  const VALID: &str = r#"
[feeder]
max_retry = 3
retry_interval_secs = 10
feed_every_secs = 1800

[ledger]
chain_id = "lino-testnet"
node_url = "http://localhost:8080"
max_tx_fee = "0.1"

[[sources]]
name = "a"
endpoint = "https://a.example.org/ticker"
json_path = "data.price"

[[sources]]
name = "b"
endpoint = "https://b.example.org/ticker"
json_path = "result.0.last"
"#;

  fn with(find: &str, replace: &str) -> String {
    VALID.replace(find, replace)
  }

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_valid_config_with_defaults() {
    let config = parse_config(VALID).unwrap();
    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.feeder.tick_interval_secs, 60);
    assert_eq!(config.feeder.request_timeout_secs, 10);
    assert_eq!(config.feeder.log_level, "info");
    assert_eq!(config.feeder.log_format, LogFormat::Json);
    assert_eq!(config.ledger.max_fee_units(), Some(10_000));
  }

  #[test]
  fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(VALID.as_bytes()).unwrap();
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.ledger.chain_id, "lino-testnet");
  }

  #[test]
  fn test_feed_interval_bounds() {
    assert!(parse_config(&with("feed_every_secs = 1800", "feed_every_secs = 600")).is_ok());
    assert!(parse_config(&with("feed_every_secs = 1800", "feed_every_secs = 599")).is_err());
    assert!(parse_config(&with("feed_every_secs = 1800", "feed_every_secs = 3599")).is_ok());
    assert!(parse_config(&with("feed_every_secs = 1800", "feed_every_secs = 3600")).is_err());
  }

  #[test]
  fn test_zero_retry_rejected() {
    assert!(parse_config(&with("max_retry = 3", "max_retry = 0")).is_err());
  }

  #[test]
  fn test_bad_fee_rejected() {
    assert!(parse_config(&with("\"0.1\"", "\"zero\"")).is_err());
    assert!(parse_config(&with("\"0.1\"", "\"0\"")).is_err());
    assert!(parse_config(&with("\"0.1\"", "\"0.000001\"")).is_err());
  }

  #[test]
  fn test_duplicate_source_rejected() {
    let err = parse_config(&with("name = \"b\"", "name = \"a\"")).unwrap_err();
    assert!(err.to_string().contains("Duplicate source name"));
  }

  #[test]
  fn test_non_http_endpoint_rejected() {
    assert!(parse_config(&with("https://b.example.org/ticker", "ftp://b/ticker")).is_err());
  }

  #[test]
  fn test_no_sources_rejected() {
    // Top-level keys must precede the first table header.
    let head = VALID.split("[[sources]]").next().unwrap();
    let empty = format!("sources = []\n{head}");
    assert!(parse_config(&empty).is_err());
    assert!(parse_config(head).is_err());
  }
}
