//! Median reduction over one round of source observations.
//!
//! The reduced price is always one of the observed values. For an even
//! count the upper of the two middle values is taken, never their mean,
//! so a single corrupted source can only be picked or not picked.

use serde::Serialize;

use super::price::Price;

/// One source's price for the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Configured source name.
    pub source: String,
    /// Parsed price.
    pub price: Price,
}

/// Complete set of observations gathered in one round.
///
/// Every configured source is present; a failing source aborts the
/// round before an observation set is ever built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceObservation {
    observations: Vec<Observation>,
}

impl PriceObservation {
    /// Build from observations in configuration order.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Observations in configuration order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of sources observed.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Price reported by a named source.
    pub fn get(&self, source: &str) -> Option<Price> {
        self.observations
            .iter()
            .find(|o| o.source == source)
            .map(|o| o.price)
    }

    /// Reduce the set to a single price (see [`reduce`]).
    pub fn median(&self) -> Option<Price> {
        let prices: Vec<Price> = self.observations.iter().map(|o| o.price).collect();
        reduce(&prices)
    }
}

/// Sort ascending and pick index `len / 2`.
///
/// Returns `None` for an empty slice.
pub fn reduce(prices: &[Price]) -> Option<Price> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted = prices.to_vec();
    sorted.sort_unstable();
    Some(sorted[sorted.len() / 2])
}
