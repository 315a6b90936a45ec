//! Price Source Port - One External Price Endpoint
//!
//! A source answers a single question per round: what is the asset's
//! price right now. Transport, payload shape and path extraction are
//! the adapter's business; the aggregator only sees a `Price` or a
//! `SourceError` naming the source.

use async_trait::async_trait;

use crate::domain::error::SourceError;
use crate::domain::price::Price;

/// Trait for a configured price source.
#[async_trait]
pub trait PriceSource: Send + Sync + 'static {
  /// Unique, human-readable source name.
  fn name(&self) -> &str;

  /// Fetch and parse one strictly positive price.
  ///
  /// # Errors
  /// Any network, status, payload or sanity-check failure.
  async fn fetch_price(&self) -> Result<Price, SourceError>;
}
