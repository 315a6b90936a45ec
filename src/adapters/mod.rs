//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP clients, key material). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `sources`: REST price endpoints with JSON path extraction
//! - `ledger`: remote ledger node gateway over HTTP
//! - `keys`: reporter signing key loaded from disk

pub mod keys;
pub mod ledger;
pub mod sources;
