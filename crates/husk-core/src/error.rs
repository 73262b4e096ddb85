//! # Error Types
//!
//! General error handling for the fixtures.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::types::ProcessId;

/// Main error type for fixture operations
///
/// This enum represents all the ways a fixture can fail. Only the usage
/// errors are expected in normal operation; everything else is a failed
/// system call that the fixtures do not try to recover from.
///
/// ## Error Categories
///
/// 1. **Input errors**: Usage, InvalidSeconds
/// 2. **Process errors**: ChannelFailed, ForkFailed, ReapFailed
/// 3. **Inspection errors**: Inspect (Linux `/proc`)
/// 4. **I/O errors**: Io (writing the countdown)
#[derive(Error, Debug)]
pub enum HuskError
{
    /// Wrong number of command-line operands
    ///
    /// The string describes what was received, e.g. "expected 1 argument, got 3".
    #[error("Usage error: {0}")]
    Usage(String),

    /// The duration operand is not a strictly positive decimal integer
    ///
    /// Zero, negative numbers, trailing garbage and values that overflow
    /// `u64` all end up here. The string is the offending operand.
    #[error("Invalid seconds value: '{0}' (expected a positive integer)")]
    InvalidSeconds(String),

    /// `pipe(2)` failed
    ///
    /// Usually means the process or the system ran out of descriptors
    /// (`EMFILE`/`ENFILE`).
    #[error("Failed to create channel: {0}")]
    ChannelFailed(#[source] nix::Error),

    /// `fork(2)` failed
    ///
    /// Typically `EAGAIN` (process limit reached) or `ENOMEM`.
    #[error("Failed to duplicate process: {0}")]
    ForkFailed(#[source] nix::Error),

    /// `waitpid(2)` on the fixture's child failed
    #[error("Failed to reap child {pid}: {source}")]
    ReapFailed
    {
        /// The child that could not be reaped
        pid: ProcessId,
        /// Underlying errno
        #[source]
        source: nix::Error,
    },

    /// Reading `/proc` failed
    ///
    /// The process may have exited (or been reaped) between listing and
    /// reading it.
    #[cfg(target_os = "linux")]
    #[error("Process inspection failed: {0}")]
    Inspect(#[from] procfs::ProcError),

    /// I/O error (writing countdown lines, etc.)
    ///
    /// This is a standard Rust `std::io::Error` converted to our error type.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, HuskError>`
///
/// ```rust
/// use husk_core::error::HuskResult;
/// fn foo() -> HuskResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type HuskResult<T> = std::result::Result<T, HuskError>;
