//! Feed command implementation

use std::sync::Arc;

use clap::Args;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::adapters::keys::LocalKey;
use crate::adapters::ledger::{LedgerClientConfig, LedgerHttpClient};
use crate::config::AppConfig;
use crate::domain::error::FeederError;
use crate::usecases::{Feeder, FeederSettings};

use super::build_aggregator;

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Reporter (validator) identity to feed for
    pub reporter: String,

    /// Reporter key file, given as @<path>
    #[arg(long = "priv-key")]
    pub priv_key: String,
}

impl FeedArgs {
    pub async fn execute(&self, config: &AppConfig) -> Result<(), FeederError> {
        let key = Arc::new(LocalKey::from_arg(&self.priv_key).map_err(FeederError::Credential)?);
        let settings = FeederSettings::from_config(config)?;

        let ledger = Arc::new(
            LedgerHttpClient::new(LedgerClientConfig::from_config(
                &config.ledger,
                settings.call_timeout,
            ))
            .map_err(FeederError::Config)?,
        );
        let aggregator = build_aggregator(config).map_err(FeederError::Config)?;

        let mut feeder = Feeder::new(ledger, key, aggregator, &self.reporter, settings);

        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        tokio::spawn(async move {
            wait_for_signal().await;
            let _ = shutdown_tx.send(());
        });

        feeder.run(shutdown_rx).await
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("SIGINT received, stopping"),
                    _ = term.recv() => info!("SIGTERM received, stopping"),
                }
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, listening for SIGINT only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("SIGINT received, stopping");
    }
}
