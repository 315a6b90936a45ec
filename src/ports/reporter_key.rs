//! Reporter Key Port - Credential Used to Sign Feeds
//!
//! The loop never handles raw key material; it asks the key for its
//! public identity (checked once at startup against the account's
//! registered keys) and for a signature over each feed payload.

use crate::ports::ledger::FeedPayload;

/// Trait for the reporter's signing credential.
pub trait ReporterKey: Send + Sync + 'static {
  /// Public identity compared with the ledger's registered keys.
  fn public_key(&self) -> String;

  /// Sign a feed payload, returning a hex signature.
  ///
  /// # Errors
  /// Returns error if the signer fails.
  fn sign(&self, payload: &FeedPayload) -> anyhow::Result<String>;
}
