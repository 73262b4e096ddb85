//! # husk Utilities
//!
//! Shared utilities, logging and config for husk.
//!
//! This crate provides the logging setup used by the fixture binaries,
//! built on `tracing`. Configuration comes from the environment only; see
//! [`logging`] for the variables.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, LogConfig, LogFormat, LogLevel, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};
