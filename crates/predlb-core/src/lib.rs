//! predlb-core
//!
//! Pure domain types, storage key layout, and cache key conventions.
//! No I/O. This is the shared vocabulary of the preDLB workspace.

pub mod cache_keys;
pub mod error;
pub mod models;
pub mod object_keys;
