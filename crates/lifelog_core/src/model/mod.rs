//! Domain models for the travel and food modules.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep persistence and view concerns out of domain shapes.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds.

pub mod food;
pub mod travel;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
