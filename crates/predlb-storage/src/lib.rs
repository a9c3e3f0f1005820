//! predlb-storage
//!
//! Key-addressed record store. Objects are JSON documents laid out by
//! `predlb_core::object_keys`, kept either in memory or on local disk.

pub mod error;
pub mod objects;
pub mod records;
pub mod state;

pub use crate::records::RecordStore;
