//! Domain layer - pure feed logic.
//!
//! Fixed-point prices, median reduction, eligibility gates and the
//! retry budget. No I/O here (hexagonal architecture inner ring);
//! everything is testable in isolation.

pub mod eligibility;
pub mod error;
pub mod median;
pub mod price;
pub mod retry;
pub mod round;

// Re-export core types for convenience
pub use eligibility::{FeedWindow, Membership, Roster};
pub use error::{FeederError, RoundError, SourceError, SourceFailure, ValidationError};
pub use median::{Observation, PriceObservation};
pub use price::{MINI_DOLLAR_SCALE, Price, PriceParseError};
pub use retry::{FeedState, RetryBudget, RetryDecision};
pub use round::{FeedReceipt, FeederStats, RoundOutcome};
