//! Median Aggregator Use Case - One Round of Source Observations
//!
//! Queries every configured source concurrently under a shared per-round
//! deadline, then reduces the observations to a single price.
//!
//! Fail-closed: if any source fails the whole observation fails. There
//! is no best-effort median over the sources that happened to answer.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use tokio::time::timeout;
use tracing::{info, instrument};

use crate::domain::error::{SourceError, SourceFailure};
use crate::domain::median::{Observation, PriceObservation};
use crate::domain::price::Price;
use crate::ports::price_source::PriceSource;

/// Aggregates all configured sources into one median price.
pub struct MedianAggregator {
  /// Sources in configuration order.
  sources: Vec<Arc<dyn PriceSource>>,
  /// Deadline shared by all source queries of one round.
  deadline: Duration,
}

impl MedianAggregator {
  /// Create an aggregator over `sources`.
  pub fn new(sources: Vec<Arc<dyn PriceSource>>, deadline: Duration) -> Self {
    Self { sources, deadline }
  }

  /// Descriptive name, e.g. `median of [a,b,c]`.
  pub fn name(&self) -> String {
    let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
    format!("median of [{}]", names.join(","))
  }

  /// Number of configured sources.
  pub fn source_count(&self) -> usize {
    self.sources.len()
  }

  /// Query every source once.
  ///
  /// # Errors
  /// The first source failure (including deadline expiry) aborts the
  /// observation.
  #[instrument(skip(self), fields(sources = self.sources.len()))]
  pub async fn observe(&self) -> Result<PriceObservation, SourceError> {
    let deadline = self.deadline;
    let queries = self.sources.iter().map(|source| async move {
      let price = timeout(deadline, source.fetch_price())
        .await
        .map_err(|_| SourceError::new(source.name(), SourceFailure::Timeout(deadline)))??;
      Ok::<_, SourceError>(Observation {
        source: source.name().to_string(),
        price,
      })
    });

    // try_join_all keeps input order and short-circuits on the first error.
    let observations = try_join_all(queries).await?;
    Ok(PriceObservation::new(observations))
  }

  /// Observe and reduce to the median price.
  pub async fn price(&self) -> Result<(Price, PriceObservation), SourceError> {
    let observation = self.observe().await?;
    let price = observation.median().ok_or_else(|| {
      SourceError::new(self.name(), SourceFailure::MissingValue("no sources configured".into()))
    })?;
    info!(
      price = %price,
      usd = %price.to_decimal().round_dp(8),
      sources = observation.len(),
      "Median price aggregated"
    );
    Ok((price, observation))
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;

  use super::*;
  use crate::domain::price::PriceParseError;

  struct Fixed {
    name: &'static str,
    result: Result<i64, ()>,
    delay: Duration,
  }

  #[async_trait]
  impl PriceSource for Fixed {
    fn name(&self) -> &str {
      self.name
    }

    async fn fetch_price(&self) -> Result<Price, SourceError> {
      tokio::time::sleep(self.delay).await;
      match self.result {
        Ok(v) => Ok(Price::from_mini_dollars(v)),
        Err(()) => Err(SourceError::new(
          self.name,
          PriceParseError::NonPositive(Price::from_mini_dollars(0)).into(),
        )),
      }
    }
  }

  fn fixed(name: &'static str, result: Result<i64, ()>) -> Arc<dyn PriceSource> {
    Arc::new(Fixed { name, result, delay: Duration::ZERO })
  }

  #[tokio::test]
  async fn test_median_of_three() {
    let agg = MedianAggregator::new(
      vec![fixed("a", Ok(30)), fixed("b", Ok(10)), fixed("c", Ok(20))],
      Duration::from_secs(10),
    );
    let (price, obs) = agg.price().await.unwrap();
    assert_eq!(price.mini_dollars(), 20);
    assert_eq!(obs.get("a"), Some(Price::from_mini_dollars(30)));
    assert_eq!(agg.name(), "median of [a,b,c]");
  }

  #[tokio::test]
  async fn test_single_failure_aborts_round() {
    let agg = MedianAggregator::new(
      vec![fixed("a", Ok(30)), fixed("bad", Err(())), fixed("c", Ok(20))],
      Duration::from_secs(10),
    );
    let err = agg.observe().await.unwrap_err();
    assert_eq!(err.source_name, "bad");
  }

  #[tokio::test(start_paused = true)]
  async fn test_slow_source_times_out() {
    let slow: Arc<dyn PriceSource> = Arc::new(Fixed {
      name: "slow",
      result: Ok(1),
      delay: Duration::from_secs(60),
    });
    let agg = MedianAggregator::new(vec![fixed("a", Ok(5)), slow], Duration::from_secs(10));
    let err = agg.observe().await.unwrap_err();
    assert_eq!(err.source_name, "slow");
    assert!(matches!(err.cause, SourceFailure::Timeout(_)));
  }

  #[tokio::test]
  async fn test_no_sources() {
    let agg = MedianAggregator::new(vec![], Duration::from_secs(1));
    assert!(agg.price().await.is_err());
  }
}
