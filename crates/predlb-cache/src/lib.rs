//! predlb-cache
//!
//! Memoized LBD probabilities per subject and per examination session, and
//! the mutation call sites that keep them from going stale.

pub mod config;
pub mod error;
pub mod mutations;
pub mod prediction;
pub mod store;

pub use prediction::PredictionCache;
pub use store::{CacheStore, MokaStore};
