//! Feeder Use Case - Gated, Rate-limited Price Feed Loop
//!
//! Startup:
//! 1. Validate once: identity not revoked, local key registered on the
//!    account, and one end-to-end median price obtainable. Any failure
//!    is fatal; the loop is never entered.
//!
//! Every tick (first tick fires immediately):
//! 1. Skip as stale if the last feed is younger than the minimum interval
//! 2. Skip as ineligible if the reporter is neither on call nor standby
//! 3. Aggregate, sign and submit the median price
//! 4. On failure wait `retry_delay` and retry the whole round, gate
//!    checks included, until the retry budget is spent (fatal)
//!
//! Rounds run strictly one after another. An interrupt ends the loop
//! cleanly while idle or while waiting to retry.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::time::{MissedTickBehavior, interval, sleep, timeout};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::eligibility::{FeedWindow, feed_window};
use crate::domain::error::{FeederError, RoundError, ValidationError};
use crate::domain::retry::{FeedState, RetryBudget, RetryDecision};
use crate::domain::round::{FeederStats, RoundOutcome};
use crate::ports::ledger::{FeedPayload, LedgerClient, SignedFeed};
use crate::ports::reporter_key::ReporterKey;

use super::aggregator::MedianAggregator;

/// Timing, retry and transaction parameters of the loop.
#[derive(Debug, Clone)]
pub struct FeederSettings {
  /// Chain identifier placed in every payload.
  pub chain_id: String,
  /// Maximum transaction fee in fee units.
  pub max_fee: u64,
  /// Minimum time between two feeds.
  pub min_feed_interval: chrono::Duration,
  /// Tick period.
  pub tick_interval: Duration,
  /// Delay before retrying a failed round.
  pub retry_delay: Duration,
  /// Consecutive failed attempts tolerated per round.
  pub max_retry: u32,
  /// Deadline of each ledger call.
  pub call_timeout: Duration,
}

impl FeederSettings {
  /// Derive settings from a validated configuration.
  ///
  /// # Errors
  /// Returns `FeederError::Config` if the fee or the feed interval
  /// cannot be converted.
  pub fn from_config(config: &AppConfig) -> Result<Self, FeederError> {
    let max_fee = config.ledger.max_fee_units().ok_or_else(|| {
      FeederError::Config(anyhow::anyhow!(
        "Invalid max_tx_fee: {:?}",
        config.ledger.max_tx_fee
      ))
    })?;

    let min_feed_interval = config.feeder.min_feed_interval().ok_or_else(|| {
      FeederError::Config(anyhow::anyhow!(
        "feed_every_secs out of range: {}",
        config.feeder.feed_every_secs
      ))
    })?;

    Ok(Self {
      chain_id: config.ledger.chain_id.clone(),
      max_fee,
      min_feed_interval,
      tick_interval: config.feeder.tick_interval(),
      retry_delay: config.feeder.retry_interval(),
      max_retry: config.feeder.max_retry,
      call_timeout: config.feeder.request_timeout(),
    })
  }
}

/// How a round ended, short of a fatal error.
enum RoundExit {
  Completed(RoundOutcome),
  Interrupted,
}

/// Price feed loop for one reporter identity.
pub struct Feeder<L: LedgerClient, K: ReporterKey> {
  ledger: Arc<L>,
  key: Arc<K>,
  aggregator: MedianAggregator,
  /// Reporter (validator) identity.
  reporter: String,
  settings: FeederSettings,
  /// Published loop state.
  state_tx: watch::Sender<FeedState>,
  stats: FeederStats,
}

impl<L: LedgerClient, K: ReporterKey> Feeder<L, K> {
  /// Create a new feeder.
  pub fn new(
    ledger: Arc<L>,
    key: Arc<K>,
    aggregator: MedianAggregator,
    reporter: impl Into<String>,
    settings: FeederSettings,
  ) -> Self {
    let (state_tx, _) = watch::channel(FeedState::Idle);
    Self {
      ledger,
      key,
      aggregator,
      reporter: reporter.into(),
      settings,
      state_tx,
      stats: FeederStats::default(),
    }
  }

  /// Watch the loop state.
  pub fn subscribe_state(&self) -> watch::Receiver<FeedState> {
    self.state_tx.subscribe()
  }

  /// Counters accumulated so far.
  pub fn stats(&self) -> &FeederStats {
    &self.stats
  }

  fn set_state(&self, state: FeedState) {
    self.state_tx.send_replace(state);
  }

  /// Run a ledger call under the per-call deadline.
  async fn bounded<T, F>(&self, what: &'static str, call: F) -> anyhow::Result<T>
  where
    F: Future<Output = anyhow::Result<T>>,
  {
    let limit = self.settings.call_timeout;
    timeout(limit, call)
      .await
      .map_err(|_| anyhow::anyhow!("{what} timed out after {limit:?}"))?
  }

  /// One-off startup checks.
  ///
  /// # Errors
  /// Revoked identity, key mismatch, failed ledger query, or no price.
  #[instrument(skip(self), fields(reporter = %self.reporter))]
  pub async fn validate(&self) -> Result<(), ValidationError> {
    self.set_state(FeedState::Validating);

    let validator = self
      .bounded("validator query", self.ledger.validator(&self.reporter))
      .await
      .map_err(ValidationError::Ledger)?;
    if validator.revoked {
      return Err(ValidationError::Revoked(self.reporter.clone()));
    }

    let keys = self
      .bounded("account query", self.ledger.account_keys(&self.reporter))
      .await
      .map_err(ValidationError::Ledger)?;
    if !keys.contains(&self.key.public_key()) {
      return Err(ValidationError::KeyMismatch(self.reporter.clone()));
    }

    let (price, _) = self
      .aggregator
      .price()
      .await
      .map_err(ValidationError::NoPrice)?;

    info!(
      pricer = %self.aggregator.name(),
      price = %price,
      "Startup validation passed"
    );
    Ok(())
  }

  /// Execute one attempt of a round: gate checks, aggregation, submission.
  ///
  /// # Errors
  /// Any ledger, source, signing or submission failure.
  pub async fn run_round(&self) -> Result<RoundOutcome, RoundError> {
    let last_feed = self
      .bounded("last feed query", self.ledger.last_feed(&self.reporter))
      .await
      .map_err(RoundError::Ledger)?;

    if let FeedWindow::Stale { elapsed, required } =
      feed_window(Utc::now(), last_feed, self.settings.min_feed_interval)
    {
      return Ok(RoundOutcome::SkippedStale { elapsed, required });
    }

    let roster = self
      .bounded("roster query", self.ledger.roster())
      .await
      .map_err(RoundError::Ledger)?;
    if !roster.is_eligible(&self.reporter) {
      return Ok(RoundOutcome::SkippedIneligible);
    }

    let (price, observation) = self.aggregator.price().await?;
    for obs in observation.observations() {
      info!(
        source = %obs.source,
        price = %obs.price,
        usd = %obs.price.to_decimal().round_dp(8),
        "Source price"
      );
    }

    let payload = FeedPayload {
      chain_id: self.settings.chain_id.clone(),
      reporter: self.reporter.clone(),
      price,
      max_fee: self.settings.max_fee,
      timestamp: Utc::now().timestamp(),
    };
    let signature = self.key.sign(&payload).map_err(RoundError::Submission)?;
    let feed = SignedFeed { payload, signature };

    let receipt = self
      .bounded("feed submission", self.ledger.submit_feed(&feed))
      .await
      .map_err(RoundError::Submission)?;

    Ok(RoundOutcome::Submitted {
      price,
      observation,
      receipt,
    })
  }

  fn log_outcome(&self, outcome: &RoundOutcome) {
    match outcome {
      RoundOutcome::Submitted { price, receipt, .. } => info!(
        price = %price,
        usd = %price.to_decimal().round_dp(8),
        height = receipt.height,
        tx = %receipt.commit_hash,
        "Price fed"
      ),
      RoundOutcome::SkippedStale { elapsed, required } => info!(
        elapsed_secs = elapsed.num_seconds(),
        required_secs = required.num_seconds(),
        "Fed recently, skipped"
      ),
      RoundOutcome::SkippedIneligible => {
        info!("Not in on-call or standby roster, skipped");
      }
    }
  }

  /// Drive one round through its attempts and retry waits.
  #[instrument(skip(self, shutdown), fields(reporter = %self.reporter))]
  async fn drive_round(
    &mut self,
    round_id: Uuid,
    shutdown: &mut broadcast::Receiver<()>,
  ) -> Result<RoundExit, FeederError> {
    let mut budget = RetryBudget::new(self.settings.max_retry);

    loop {
      self.set_state(FeedState::Attempt {
        round_id,
        attempt: budget.next_attempt(),
      });

      let err = match self.run_round().await {
        Ok(outcome) => {
          self.log_outcome(&outcome);
          return Ok(RoundExit::Completed(outcome));
        }
        Err(err) => err,
      };

      self.stats.failed_attempts += 1;
      match budget.record_failure() {
        RetryDecision::Exhausted { failures } => {
          // No trailing sleep before giving up.
          error!(error = %err, failures, "Retry budget exhausted");
          return Err(FeederError::RetryExhausted {
            attempts: failures,
            last: err,
          });
        }
        RetryDecision::Retry { failures } => {
          let delay = self.settings.retry_delay;
          warn!(
            error = %err,
            failures,
            max_retry = self.settings.max_retry,
            delay_secs = delay.as_secs(),
            "Feed attempt failed, retrying"
          );
          self.set_state(FeedState::RetryWait {
            round_id,
            failures,
            delay,
          });

          tokio::select! {
            biased;
            _ = shutdown.recv() => return Ok(RoundExit::Interrupted),
            () = sleep(delay) => {}
          }
        }
      }
    }
  }

  /// Validate, then feed on every tick until interrupted or fatally failed.
  ///
  /// # Errors
  /// Validation failure or an exhausted retry budget.
  pub async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) -> Result<(), FeederError> {
    if let Err(e) = self.validate().await {
      self.set_state(FeedState::Aborted);
      return Err(e.into());
    }

    let mut ticker = interval(self.settings.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
      reporter = %self.reporter,
      tick_secs = self.settings.tick_interval.as_secs(),
      min_feed_interval_secs = self.settings.min_feed_interval.num_seconds(),
      "Feed loop started"
    );

    loop {
      self.set_state(FeedState::Idle);

      tokio::select! {
        biased;
        _ = shutdown.recv() => break,
        _ = ticker.tick() => {}
      }

      match self.drive_round(Uuid::new_v4(), &mut shutdown).await {
        Ok(RoundExit::Completed(outcome)) => self.stats.record(&outcome),
        Ok(RoundExit::Interrupted) => break,
        Err(e) => {
          self.set_state(FeedState::Aborted);
          return Err(e);
        }
      }
    }

    self.set_state(FeedState::Stopped);
    info!(
      rounds = self.stats.rounds,
      submitted = self.stats.submitted,
      stale = self.stats.stale,
      ineligible = self.stats.ineligible,
      failed_attempts = self.stats.failed_attempts,
      "Interrupt received, feed loop stopped"
    );
    Ok(())
  }
}
