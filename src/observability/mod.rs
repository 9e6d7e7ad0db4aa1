//! Logging for the record store
//!
//! Structured, synchronous, and informational only: no store operation
//! behaves differently because of anything logged here.

mod logger;

pub use logger::{Logger, Severity};
