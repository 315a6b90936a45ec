//! Ledger Port - Remote Ledger Interaction Interface
//!
//! Read-only snapshots of reporter state (validator status, registered
//! keys, last feed time, roster) plus the feed submission call. Every
//! value is fetched fresh per attempt; nothing is cached across rounds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::eligibility::Roster;
use crate::domain::price::Price;
use crate::domain::round::FeedReceipt;

/// Validator status of a reporter identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidatorInfo {
  /// Validator account name.
  pub username: String,
  /// Whether the validator has been revoked.
  #[serde(default, rename = "has_revoked")]
  pub revoked: bool,
}

/// Public keys registered for an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountKeys {
  /// Signing key identity.
  pub signing_key: String,
  /// Transaction key identity, if one is registered.
  #[serde(default)]
  pub transaction_key: Option<String>,
}

impl AccountKeys {
  /// Whether `public_key` is one of the registered keys.
  ///
  /// Key identities are hex strings; comparison ignores case and an
  /// optional `0x` prefix.
  pub fn contains(&self, public_key: &str) -> bool {
    let wanted = normalize_key(public_key);
    std::iter::once(&self.signing_key)
      .chain(self.transaction_key.as_ref())
      .any(|k| normalize_key(k) == wanted)
  }
}

fn normalize_key(key: &str) -> String {
  let key = key.trim();
  key
    .strip_prefix("0x")
    .or_else(|| key.strip_prefix("0X"))
    .unwrap_or(key)
    .to_ascii_lowercase()
}

/// Unsigned feed transaction body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPayload {
  pub chain_id: String,
  pub reporter: String,
  pub price: Price,
  /// Maximum fee in fee units.
  pub max_fee: u64,
  /// Unix seconds.
  pub timestamp: i64,
}

impl FeedPayload {
  /// Canonical bytes that get signed.
  ///
  /// # Errors
  /// Returns error if the payload cannot be serialized.
  pub fn signing_bytes(&self) -> serde_json::Result<Vec<u8>> {
    // Field order is fixed by the struct definition.
    serde_json::to_vec(self)
  }
}

/// Feed payload plus the reporter's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedFeed {
  #[serde(flatten)]
  pub payload: FeedPayload,
  /// Hex-encoded signature over `payload.signing_bytes()`.
  pub signature: String,
}

/// Trait for the remote ledger client.
#[async_trait]
pub trait LedgerClient: Send + Sync + 'static {
  /// Validator status for an identity.
  async fn validator(&self, reporter: &str) -> anyhow::Result<ValidatorInfo>;

  /// Registered public keys of an account.
  async fn account_keys(&self, reporter: &str) -> anyhow::Result<AccountKeys>;

  /// Time of the reporter's last price feed; `None` if it never fed.
  async fn last_feed(&self, reporter: &str) -> anyhow::Result<Option<DateTime<Utc>>>;

  /// Current on-call / standby roster.
  async fn roster(&self) -> anyhow::Result<Roster>;

  /// Submit a signed price feed and wait for commit.
  async fn submit_feed(&self, feed: &SignedFeed) -> anyhow::Result<FeedReceipt>;
}
