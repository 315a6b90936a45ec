//! Outcome of a round and process-wide feed counters.

use chrono::Duration;

use super::median::PriceObservation;
use super::price::Price;

/// Ledger confirmation of a submitted feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedReceipt {
  /// Block height the transaction was committed at.
  pub height: u64,
  /// Commit / transaction hash.
  pub commit_hash: String,
}

/// Terminal outcome of a round that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
  /// Price fed to the ledger.
  Submitted {
    price: Price,
    observation: PriceObservation,
    receipt: FeedReceipt,
  },
  /// Minimum feed interval has not elapsed.
  SkippedStale { elapsed: Duration, required: Duration },
  /// Reporter is neither on call nor on standby.
  SkippedIneligible,
}

impl RoundOutcome {
  /// Short label for logs.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Submitted { .. } => "submitted",
      Self::SkippedStale { .. } => "skipped_stale",
      Self::SkippedIneligible => "skipped_ineligible",
    }
  }
}

/// Counters accumulated over the life of the feed loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeederStats {
  pub rounds: u64,
  pub submitted: u64,
  pub stale: u64,
  pub ineligible: u64,
  pub failed_attempts: u64,
}

impl FeederStats {
  /// Count a completed round.
  pub fn record(&mut self, outcome: &RoundOutcome) {
    self.rounds += 1;
    match outcome {
      RoundOutcome::Submitted { .. } => self.submitted += 1,
      RoundOutcome::SkippedStale { .. } => self.stale += 1,
      RoundOutcome::SkippedIneligible => self.ineligible += 1,
    }
  }
}
