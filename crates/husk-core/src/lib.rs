//! # husk-core
//!
//! Process lifecycle test fixtures.
//!
//! This crate provides two small, predictable targets for process-inspection
//! tooling:
//! - A countdown emitter that stays alive for N seconds, printing progress
//! - A leak/zombie fixture that leaks pipe descriptors and leaves an exited
//!   child unreaped for a fixed window
//!
//! plus helpers that read `/proc` to confirm what the fixtures did.
//!
//! ## Platform Support
//!
//! - **Linux**: everything, including the `/proc` inspection helpers
//! - **Other Unix**: the fixtures only
//!
//! ## Why unsafe code is needed
//!
//! `fork()` is unsafe: after it returns in the child of a multi-threaded
//! process only async-signal-safe calls are allowed. The fixture's child
//! branch sticks to leaking descriptors and calling `_exit`.

#![allow(unsafe_code)] // Required for fork() and _exit()

pub mod countdown;
pub mod error;
pub mod fixture;
#[cfg(target_os = "linux")]
pub mod inspect;
pub mod pause;
pub mod prelude;
pub mod types;

// Re-export commonly used types
pub use error::{HuskError, HuskResult};
pub use fixture::LeakZombieFixture;
pub use types::{ProcessId, Seconds};
