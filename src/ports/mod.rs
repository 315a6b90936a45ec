//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use cases require from the
//! outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `PriceSource`: one external price endpoint
//! - `LedgerClient`: reporter state queries and feed submission
//! - `ReporterKey`: signing credential

pub mod ledger;
pub mod price_source;
pub mod reporter_key;
