//! Ledger Adapters
//!
//! - `client`: JSON REST gateway of the remote ledger node

pub mod client;

pub use client::{LedgerClientConfig, LedgerHttpClient};
