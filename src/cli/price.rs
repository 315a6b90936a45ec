//! Price command implementation

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::AppConfig;
use crate::domain::median::PriceObservation;
use crate::domain::price::Price;

use super::build_aggregator;

/// Deadline of the one-shot query.
const PRICE_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Args, Debug)]
pub struct PriceArgs {}

impl PriceArgs {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let aggregator = build_aggregator(config)?;

        let (median, observation) = tokio::time::timeout(PRICE_DEADLINE, aggregator.price())
            .await
            .context("Price query timed out")??;

        print!("{}", format_price_table(&observation));
        println!("{}: {} ({} USD)", aggregator.name(), median, usd(median));
        Ok(())
    }
}

fn usd(price: Price) -> String {
    format!("{:.8}", price.to_decimal())
}

/// Render observations as `| name | mini-dollar | USD |` rows.
pub fn format_price_table(observation: &PriceObservation) -> String {
    let mut out = format!("|{:<10}|{:<25}|{:<18}|\n", "name", "price (mini-dollar)", "price (USD)");
    for obs in observation.observations() {
        let _ = writeln!(
            out,
            "|{:<10}|{:<25}|{:<18}|",
            obs.source,
            obs.price.to_string(),
            usd(obs.price)
        );
    }
    out
}
