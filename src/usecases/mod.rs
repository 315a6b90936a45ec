//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the feeder's workflows.
//!
//! Use cases:
//! - `MedianAggregator`: one round of source observations → median price
//! - `Feeder`: startup validation and the gated, retrying feed loop

pub mod aggregator;
pub mod feeder;

pub use aggregator::MedianAggregator;
pub use feeder::{Feeder, FeederSettings};
