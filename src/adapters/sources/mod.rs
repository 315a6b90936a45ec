//! Price Source Adapters
//!
//! - `rest`: HTTP GET endpoint + JSON path extraction
//! - `json_path`: dotted path lookup used by `rest`

pub mod json_path;
pub mod rest;

pub use rest::RestPriceSource;
