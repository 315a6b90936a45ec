//! CLI interface for price-feeder
//!
//! Provides subcommands for:
//! - `price`: query every source once, print the prices and the median
//! - `feed`: run the feed loop for a reporter until interrupted

mod feed;
mod price;

pub use feed::FeedArgs;
pub use price::{PriceArgs, format_price_table};

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::adapters::sources::RestPriceSource;
use crate::config::{AppConfig, loader};
use crate::domain::error::FeederError;
use crate::ports::price_source::PriceSource;
use crate::telemetry;
use crate::usecases::MedianAggregator;

#[derive(Parser, Debug)]
#[command(name = "price-feeder")]
#[command(about = "Query and feed the median price of the asset")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query and print the current price
    Price(PriceArgs),
    /// Feed the price on behalf of a reporter until interrupted
    Feed(FeedArgs),
}

impl Cli {
    /// Load config, initialise logging and dispatch the subcommand.
    pub async fn run(self) -> Result<()> {
        let config = loader::load_config(&self.config).map_err(FeederError::Config)?;
        telemetry::init_logging(&config.feeder.log_level, config.feeder.log_format)?;
        info!(
            path = %self.config,
            sources = config.sources.len(),
            chain_id = %config.ledger.chain_id,
            feed_every_secs = config.feeder.feed_every_secs,
            "Configuration loaded successfully"
        );

        match self.command {
            Commands::Price(args) => args.execute(&config).await,
            Commands::Feed(args) => args.execute(&config).await.map_err(Into::into),
        }
    }
}

/// Build one REST source per configured entry behind a median aggregator.
pub(crate) fn build_aggregator(config: &AppConfig) -> Result<MedianAggregator> {
    let timeout = config.feeder.request_timeout();
    let sources = RestPriceSource::from_configs(&config.sources, timeout)
        .context("Failed to create price sources")?
        .into_iter()
        .map(|s| Arc::new(s) as Arc<dyn PriceSource>)
        .collect();
    Ok(MedianAggregator::new(sources, timeout))
}
