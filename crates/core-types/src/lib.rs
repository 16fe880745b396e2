//! # Tradelog Core Types
//!
//! Layer 0 of the workspace: the plain data a trading journal hands to the
//! analytics engine. Nothing in here performs I/O or computes statistics.

pub mod enums;
pub mod error;
pub mod trade;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, Outcome};
pub use error::CoreError;
pub use trade::TradeRecord;
