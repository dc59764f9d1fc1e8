//! sl-core: stable foundation for segloss.
//!
//! Contains:
//! - rating (nameplate constants + resistance-temperature correction)
//! - numeric (float helpers + tolerances)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod rating;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SlError, SlResult};
pub use numeric::*;
pub use rating::*;
