//! Per-round gate decisions: feed rate limit and roster membership.
//!
//! Inputs are snapshots fetched fresh from the ledger each attempt;
//! nothing here caches state between rounds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Current on-call / standby reporter sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
  /// Identities currently on call.
  #[serde(default)]
  pub oncall: Vec<String>,
  /// Identities on standby.
  #[serde(default)]
  pub standby: Vec<String>,
}

/// Where a reporter sits in the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
  OnCall,
  Standby,
  Absent,
}

impl Roster {
  /// Look up a reporter. On-call wins if listed in both.
  pub fn membership(&self, reporter: &str) -> Membership {
    if self.oncall.iter().any(|id| id == reporter) {
      Membership::OnCall
    } else if self.standby.iter().any(|id| id == reporter) {
      Membership::Standby
    } else {
      Membership::Absent
    }
  }

  /// True when the reporter may submit this round.
  pub fn is_eligible(&self, reporter: &str) -> bool {
    self.membership(reporter) != Membership::Absent
  }
}

/// Result of the minimum-feed-interval check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedWindow {
  /// No previous feed, or the interval has elapsed.
  Open,
  /// Fed too recently.
  Stale {
    /// Time since the last feed (may be negative under clock skew).
    elapsed: Duration,
    /// Configured minimum interval.
    required: Duration,
  },
}

/// Decide whether enough time has passed since `last_feed`.
pub fn feed_window(
  now: DateTime<Utc>,
  last_feed: Option<DateTime<Utc>>,
  min_interval: Duration,
) -> FeedWindow {
  match last_feed {
    Some(last) if now - last < min_interval => FeedWindow::Stale {
      elapsed: now - last,
      required: min_interval,
    },
    _ => FeedWindow::Open,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn roster() -> Roster {
    Roster {
      oncall: vec!["alice".into(), "bob".into()],
      standby: vec!["carol".into()],
    }
  }

  #[test]
  fn test_membership() {
    let r = roster();
    assert_eq!(r.membership("bob"), Membership::OnCall);
    assert_eq!(r.membership("carol"), Membership::Standby);
    assert_eq!(r.membership("dave"), Membership::Absent);
    assert!(r.is_eligible("carol"));
    assert!(!r.is_eligible("dave"));
  }

  #[test]
  fn test_never_fed_is_open() {
    let now = Utc::now();
    assert_eq!(
      feed_window(now, None, Duration::seconds(600)),
      FeedWindow::Open
    );
  }

  #[test]
  fn test_recent_feed_is_stale() {
    let now = Utc::now();
    let last = now - Duration::seconds(599);
    assert_eq!(
      feed_window(now, Some(last), Duration::seconds(600)),
      FeedWindow::Stale {
        elapsed: Duration::seconds(599),
        required: Duration::seconds(600),
      }
    );
  }

  #[test]
  fn test_exact_interval_is_open() {
    let now = Utc::now();
    let last = now - Duration::seconds(600);
    assert_eq!(
      feed_window(now, Some(last), Duration::seconds(600)),
      FeedWindow::Open
    );
  }

  #[test]
  fn test_future_last_feed_is_stale() {
    let now = Utc::now();
    let last = now + Duration::seconds(30);
    assert!(matches!(
      feed_window(now, Some(last), Duration::seconds(600)),
      FeedWindow::Stale { .. }
    ));
  }
}
