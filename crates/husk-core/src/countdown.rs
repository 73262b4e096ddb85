//! # Countdown Emitter
//!
//! Prints `0`, `1`, ... `N-1`, one line per second, then returns.
//!
//! The emitter is a target for attach-style tooling: it stays alive for a
//! predictable amount of time and shows progress on stdout while it does.
//!
//! ## Example
//!
//! ```rust
//! use husk_core::countdown::Countdown;
//! use husk_core::pause::RecordingPause;
//! use husk_core::types::Seconds;
//!
//! let mut out = Vec::new();
//! let mut pause = RecordingPause::default();
//! let secs: Seconds = "3".parse()?;
//! Countdown::new(secs).with_pause(&mut pause).run(&mut out)?;
//!
//! assert_eq!(out, b"0\n1\n2\n");
//! assert_eq!(pause.requested().len(), 3);
//! # Ok::<(), husk_core::error::HuskError>(())
//! ```

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{HuskError, HuskResult};
use crate::pause::{Pause, SystemPause};
use crate::types::Seconds;

/// Pause between two emitted lines
pub const TICK: Duration = Duration::from_secs(1);

/// Parse the single duration operand
pub fn parse_seconds(raw: &str) -> HuskResult<Seconds>
{
    raw.parse()
}

/// Validate a full argument vector (program name first)
///
/// Exactly one operand is accepted. The program name itself is skipped.
///
/// ```rust
/// use husk_core::countdown::parse_args;
///
/// assert_eq!(parse_args(["countdown", "2"])?.get(), 2);
/// assert!(parse_args(["countdown"]).is_err());
/// assert!(parse_args(["countdown", "1", "2"]).is_err());
/// # Ok::<(), husk_core::error::HuskError>(())
/// ```
pub fn parse_args<I, S>(args: I) -> HuskResult<Seconds>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let operands: Vec<S> = args.into_iter().skip(1).collect();
    match operands.as_slice() {
        [single] => parse_seconds(single.as_ref()),
        other => Err(HuskError::Usage(format!("expected 1 argument, got {}", other.len()))),
    }
}

/// Usage line printed on stderr for any input error
pub fn usage(program: &str) -> String
{
    format!("Usage: {program} <seconds to sleep>")
}

/// The emitter itself
#[derive(Debug, Clone)]
pub struct Countdown<P = SystemPause>
{
    seconds: Seconds,
    pause: P,
}

impl Countdown<SystemPause>
{
    /// Emitter that really sleeps between lines
    pub fn new(seconds: Seconds) -> Self
    {
        Countdown {
            seconds,
            pause: SystemPause,
        }
    }
}

impl<P: Pause> Countdown<P>
{
    /// Replace the pause implementation
    pub fn with_pause<Q: Pause>(self, pause: Q) -> Countdown<Q>
    {
        Countdown {
            seconds: self.seconds,
            pause,
        }
    }

    /// Emit every line, pausing one tick after each
    ///
    /// Each line is flushed before the pause so an observer sees it
    /// immediately, even when `out` is a pipe.
    ///
    /// ## Errors
    ///
    /// Returns [`HuskError::Io`] on the first failed write or flush. Lines
    /// already written stay written.
    pub fn run<W: Write>(mut self, out: &mut W) -> HuskResult<()>
    {
        info!(seconds = %self.seconds, "countdown started");

        for tick in 0..self.seconds.get() {
            writeln!(out, "{tick}")?;
            out.flush()?;
            debug!(tick, "emitted");
            self.pause.pause(TICK);
        }

        info!("countdown finished");
        Ok(())
    }
}
