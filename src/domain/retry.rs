//! Feed loop state and the per-round retry budget.
//!
//! A round is retried as a whole (gate checks included) until it either
//! completes or `max_attempts` consecutive attempts have failed. Each
//! round starts with a fresh budget. The budget is a plain value so the
//! loop can publish it as state instead of hiding it in nested loops.

use std::time::Duration;

use uuid::Uuid;

/// Observable state of the feed loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
  /// Waiting for the next tick.
  Idle,
  /// One-off startup checks.
  Validating,
  /// An attempt of a round is in flight.
  Attempt {
    /// Round identifier (shared by all its attempts).
    round_id: Uuid,
    /// 1-based attempt number.
    attempt: u32,
  },
  /// Sleeping before the next attempt.
  RetryWait {
    round_id: Uuid,
    /// Consecutive failures so far.
    failures: u32,
    delay: Duration,
  },
  /// Stopped on interrupt.
  Stopped,
  /// Terminated on a fatal error.
  Aborted,
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
  /// Sleep, then retry the whole round.
  Retry { failures: u32 },
  /// Budget spent; the loop must terminate.
  Exhausted { failures: u32 },
}

/// Counts consecutive failed attempts within a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryBudget {
  max_attempts: u32,
  failures: u32,
}

impl RetryBudget {
  /// Budget tolerating `max_attempts - 1` failures; the
  /// `max_attempts`-th failure is fatal. Zero is treated as one.
  pub fn new(max_attempts: u32) -> Self {
    Self {
      max_attempts: max_attempts.max(1),
      failures: 0,
    }
  }

  /// Record a failed attempt.
  pub fn record_failure(&mut self) -> RetryDecision {
    self.failures += 1;
    if self.failures >= self.max_attempts {
      RetryDecision::Exhausted {
        failures: self.failures,
      }
    } else {
      RetryDecision::Retry {
        failures: self.failures,
      }
    }
  }

  /// Consecutive failures so far.
  pub fn failures(&self) -> u32 {
    self.failures
  }

  /// 1-based number of the next attempt.
  pub fn next_attempt(&self) -> u32 {
    self.failures + 1
  }
}
