//! # Types
//!
//! Small value types shared by the fixtures and the inspection helpers.
//!
//! These types keep raw integers (PIDs, durations, state letters) out of the
//! public API so callers can't mix them up.

pub mod process;
pub mod seconds;
pub mod stage;

// Re-export all public types
pub use process::{ProcessId, ProcessState};
pub use seconds::Seconds;
pub use stage::FixtureStage;
