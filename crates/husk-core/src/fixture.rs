//! # Leak/Zombie Fixture
//!
//! Produces two resource problems on purpose, so inspection tools have
//! something to find:
//!
//! - **Descriptor leaks**: the child exits without closing either end of a
//!   pipe, and the parent closes only the read end.
//! - **A zombie**: the child exits right away, but the parent waits
//!   [`ZOMBIE_WINDOW`] before reaping it.
//!
//! ## Lifecycle (parent)
//!
//! ```text
//! created channel → duplicated → one endpoint released → sleeping → child reaped → terminated
//! ```
//!
//! Every transition is unconditional and happens once. A failing system call
//! aborts the run with an error; nothing is retried.
//!
//! ## Example
//!
//! ```rust,no_run
//! use husk_core::fixture::LeakZombieFixture;
//!
//! let report = LeakZombieFixture::new().run()?;
//! println!("reaped {:?}", report.child);
//! # Ok::<(), husk_core::error::HuskError>(())
//! ```

use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::time::Duration;

use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult};
use tracing::{debug, info};

use crate::error::{HuskError, HuskResult};
use crate::pause::{Pause, SystemPause};
use crate::types::{FixtureStage, ProcessId};

/// How long the parent leaves its exited child unreaped
pub const ZOMBIE_WINDOW: Duration = Duration::from_secs(2);

/// Both ends of a freshly created pipe
///
/// Dropping a `Channel` closes both ends. The fixture never does that: it
/// takes the ends apart with [`Channel::release_read`] in the parent and
/// [`Channel::leak`] in the child.
#[derive(Debug)]
pub struct Channel
{
    read: OwnedFd,
    write: OwnedFd,
}

impl Channel
{
    /// Create the pipe; both ends are returned together or not at all
    ///
    /// ## Errors
    ///
    /// [`HuskError::ChannelFailed`] when `pipe(2)` fails.
    pub fn open() -> HuskResult<Self>
    {
        let (read, write) = nix::unistd::pipe().map_err(HuskError::ChannelFailed)?;
        Ok(Channel { read, write })
    }

    /// Descriptor number of the read end
    pub fn read_fd(&self) -> RawFd
    {
        self.read.as_raw_fd()
    }

    /// Descriptor number of the write end
    pub fn write_fd(&self) -> RawFd
    {
        self.write.as_raw_fd()
    }

    /// Close the read end and leak the write end
    ///
    /// Returns the leaked write descriptor, which stays open until the
    /// process exits.
    pub fn release_read(self) -> RawFd
    {
        drop(self.read);
        self.write.into_raw_fd()
    }

    /// Leak both ends, returning `(read, write)`
    ///
    /// Does not allocate or lock, so it is safe to call in a forked child.
    pub fn leak(self) -> (RawFd, RawFd)
    {
        (self.read.into_raw_fd(), self.write.into_raw_fd())
    }
}

/// How the reaped child ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit
{
    /// Normal exit with this status code
    Exited(i32),
    /// Killed by this signal number
    Signaled(i32),
    /// `waitpid` reported something other than termination
    Other,
}

impl From<WaitStatus> for ChildExit
{
    fn from(status: WaitStatus) -> Self
    {
        match status {
            WaitStatus::Exited(_, code) => ChildExit::Exited(code),
            WaitStatus::Signaled(_, signal, _) => ChildExit::Signaled(signal as i32),
            _ => ChildExit::Other,
        }
    }
}

/// What the parent knows about the run so far
///
/// The same report is handed to the [`StageObserver`] at every stage and
/// returned at the end. Fields fill in as the run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureReport
{
    /// Read end descriptor (closed in the parent from `ReadEndReleased` on)
    pub read_fd: RawFd,
    /// Write end descriptor (never closed by the parent)
    pub write_fd: RawFd,
    /// The forked child, once it exists
    pub child: Option<ProcessId>,
    /// The child's exit, once reaped
    pub reaped: Option<ChildExit>,
}

/// Gets told about each parent-side stage transition
///
/// Runs in the parent only, synchronously, before the fixture moves on. An
/// observer called at [`FixtureStage::Sleeping`] sees the process tree while
/// the zombie window is open.
///
/// Any `FnMut(FixtureStage, &FixtureReport)` closure is an observer.
pub trait StageObserver
{
    /// Called once per stage, in order
    fn on_stage(&mut self, stage: FixtureStage, report: &FixtureReport);
}

impl<F> StageObserver for F
where
    F: FnMut(FixtureStage, &FixtureReport),
{
    fn on_stage(&mut self, stage: FixtureStage, report: &FixtureReport)
    {
        self(stage, report);
    }
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver
{
    fn on_stage(&mut self, _stage: FixtureStage, _report: &FixtureReport) {}
}

/// The fixture
#[derive(Debug, Clone)]
pub struct LeakZombieFixture<P = SystemPause, O = NoopObserver>
{
    pause: P,
    observer: O,
}

impl LeakZombieFixture
{
    /// Fixture with a real two-second zombie window and no observer
    pub fn new() -> Self
    {
        LeakZombieFixture {
            pause: SystemPause,
            observer: NoopObserver,
        }
    }
}

impl Default for LeakZombieFixture
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<P: Pause, O: StageObserver> LeakZombieFixture<P, O>
{
    /// Replace the pause used for the zombie window
    pub fn with_pause<Q: Pause>(self, pause: Q) -> LeakZombieFixture<Q, O>
    {
        LeakZombieFixture {
            pause,
            observer: self.observer,
        }
    }

    /// Attach a stage observer
    pub fn with_observer<N: StageObserver>(self, observer: N) -> LeakZombieFixture<P, N>
    {
        LeakZombieFixture {
            pause: self.pause,
            observer,
        }
    }

    /// Run the whole lifecycle in the calling process
    ///
    /// Only the parent returns from this function. The child calls `_exit(0)`
    /// straight after `fork()` and never runs destructors, atexit handlers or
    /// observers.
    ///
    /// The write end stays open in the calling process after this returns,
    /// for as long as the process lives.
    ///
    /// ## Errors
    ///
    /// - [`HuskError::ChannelFailed`] if the pipe can't be created
    /// - [`HuskError::ForkFailed`] if the process can't be duplicated (both
    ///   ends are closed again in that case)
    /// - [`HuskError::ReapFailed`] if `waitpid` fails
    pub fn run(mut self) -> HuskResult<FixtureReport>
    {
        let channel = Channel::open()?;
        let mut report = FixtureReport {
            read_fd: channel.read_fd(),
            write_fd: channel.write_fd(),
            child: None,
            reaped: None,
        };
        self.enter(FixtureStage::ChannelCreated, &report);

        // SAFETY: the child branch only leaks descriptors and calls _exit,
        // both async-signal-safe, so forking a multi-threaded process is fine.
        let forked = unsafe { fork() }.map_err(HuskError::ForkFailed)?;
        let child = match forked {
            ForkResult::Child => {
                let _leaked = channel.leak();
                // SAFETY: _exit has no preconditions
                unsafe { libc::_exit(0) }
            }
            ForkResult::Parent { child } => ProcessId::from(child),
        };
        report.child = Some(child);
        self.enter(FixtureStage::Duplicated, &report);

        let leaked = channel.release_read();
        debug!(read_fd = report.read_fd, write_fd = leaked, "read end closed, write end leaked");
        self.enter(FixtureStage::ReadEndReleased, &report);

        self.enter(FixtureStage::Sleeping, &report);
        self.pause.pause(ZOMBIE_WINDOW);

        let status = waitpid(child.as_pid(), None).map_err(|source| HuskError::ReapFailed { pid: child, source })?;
        report.reaped = Some(ChildExit::from(status));
        info!(%child, ?status, "child reaped");
        self.enter(FixtureStage::ChildReaped, &report);

        self.enter(FixtureStage::Terminated, &report);
        Ok(report)
    }

    fn enter(&mut self, stage: FixtureStage, report: &FixtureReport)
    {
        debug!(%stage, "fixture stage");
        self.observer.on_stage(stage, report);
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests
{
    use super::*;
    use crate::inspect::{DescriptorTarget, ProcessSnapshot};

    #[test]
    fn test_leak_keeps_both_ends_open()
    {
        let channel = Channel::open().unwrap();
        let (read_fd, write_fd) = channel.leak();

        // What the child holds between fork and _exit
        let me = ProcessSnapshot::capture(ProcessId::current()).unwrap();
        let read_end = me.descriptor(read_fd).expect("read end still open");
        let write_end = me.descriptor(write_fd).expect("write end still open");
        assert!(matches!(read_end.target, DescriptorTarget::Pipe(_)));
        assert_eq!(read_end.target, write_end.target);

        nix::unistd::close(read_fd).unwrap();
        nix::unistd::close(write_fd).unwrap();
    }

    #[test]
    fn test_release_read_keeps_write_end_only()
    {
        let channel = Channel::open().unwrap();
        let read_fd = channel.read_fd();
        let write_fd = channel.release_read();

        let me = ProcessSnapshot::capture(ProcessId::current()).unwrap();
        let write_end = me.descriptor(write_fd).expect("write end leaked");
        assert!(matches!(write_end.target, DescriptorTarget::Pipe(_)));
        // The read number may already be reused, but not by this pipe
        assert!(me.descriptor(read_fd).map_or(true, |d| d.target != write_end.target));

        nix::unistd::close(write_fd).unwrap();
    }
}
