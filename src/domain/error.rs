//! Error taxonomy for the feeder.
//!
//! - `SourceError` / `RoundError`: abort the current attempt only and
//!   drive the retry budget.
//! - `ValidationError`, `FeederError::Config`, `FeederError::Credential`:
//!   fatal before the loop starts.
//! - `FeederError::RetryExhausted`: fatal, carries the last round error.

use std::time::Duration;

use thiserror::Error;

use super::price::PriceParseError;

/// Failure of a single price source.
#[derive(Debug, Error)]
#[error("source {source_name}: {cause}")]
pub struct SourceError {
    /// Configured source name.
    pub source_name: String,
    /// What went wrong.
    pub cause: SourceFailure,
}

impl SourceError {
    pub fn new(source_name: impl Into<String>, cause: SourceFailure) -> Self {
        Self {
            source_name: source_name.into(),
            cause,
        }
    }
}

/// Reason a source could not produce a price.
#[derive(Debug, Error)]
pub enum SourceFailure {
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("invalid JSON response: {0}")]
    InvalidJson(String),
    #[error("no value at path {0:?}")]
    MissingValue(String),
    #[error(transparent)]
    Parse(#[from] PriceParseError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of one attempt of a round.
#[derive(Debug, Error)]
pub enum RoundError {
    /// A price source failed; no partial median is taken.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// A gate query (last feed, roster) failed.
    #[error("ledger query failed: {0:#}")]
    Ledger(anyhow::Error),
    /// Signing or submitting the feed failed.
    #[error("submission failed: {0:#}")]
    Submission(anyhow::Error),
}

/// Fatal startup check failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("reporter {0} is revoked")]
    Revoked(String),
    #[error("provided key does not match the registered keys of {0}")]
    KeyMismatch(String),
    #[error("ledger query failed: {0:#}")]
    Ledger(anyhow::Error),
    #[error("no price could be aggregated: {0}")]
    NoPrice(#[source] SourceError),
}

/// Errors surfaced to the process.
#[derive(Debug, Error)]
pub enum FeederError {
    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),
    #[error("invalid reporter key: {0:#}")]
    Credential(anyhow::Error),
    #[error("startup validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("giving up after {attempts} failed attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: RoundError,
    },
}
