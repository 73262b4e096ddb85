//! Process identifiers and kernel-reported process states.

use std::fmt;

use nix::unistd::Pid;

/// Process identifier (PID)
///
/// A PID is a unique number assigned to each running process by the operating
/// system. It stays allocated to a child until the parent reaps it, which is
/// exactly what the leak/zombie fixture relies on.
///
/// ## Why wrap it in a struct?
///
/// Using a newtype pattern (`struct ProcessId(u32)`) instead of a raw `u32`
/// or `nix::unistd::Pid` keeps the public API independent of `nix` and makes
/// it clear what the value represents.
///
/// ## Example
///
/// ```rust
/// use husk_core::types::ProcessId;
///
/// let pid = ProcessId::from(12345);
/// assert_eq!(u32::from(pid), 12345);
/// assert_eq!(pid.to_string(), "12345");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);

impl ProcessId
{
    /// The PID of the calling process
    pub fn current() -> Self
    {
        ProcessId(std::process::id())
    }

    /// Convert to the `nix` representation used by `waitpid`
    #[allow(clippy::cast_possible_wrap)]
    pub fn as_pid(self) -> Pid
    {
        Pid::from_raw(self.0 as i32)
    }
}

impl From<u32> for ProcessId
{
    fn from(pid: u32) -> Self
    {
        ProcessId(pid)
    }
}

impl From<ProcessId> for u32
{
    fn from(pid: ProcessId) -> Self
    {
        pid.0
    }
}

impl From<Pid> for ProcessId
{
    fn from(pid: Pid) -> Self
    {
        ProcessId(pid.as_raw().unsigned_abs())
    }
}

impl fmt::Display for ProcessId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// Scheduler state of a process as reported by the kernel
///
/// This mirrors the single-letter state field of `/proc/<pid>/stat`. Only the
/// distinction between [`ProcessState::Zombie`] and everything else matters
/// to the fixtures; the other variants exist so snapshots print something
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState
{
    /// `R`: running or runnable
    Running,
    /// `S`: interruptible sleep (e.g. inside `sleep(3)`)
    Sleeping,
    /// `D`: uninterruptible disk sleep
    Waiting,
    /// `Z`: terminated but not yet reaped by its parent
    Zombie,
    /// `T`/`t`: stopped by a signal or a tracer
    Stopped,
    /// `X`: dead, about to disappear from the process table
    Dead,
    /// Any other state letter
    Other(char),
}

impl ProcessState
{
    /// Map a `/proc/<pid>/stat` state letter
    ///
    /// ```rust
    /// use husk_core::types::ProcessState;
    ///
    /// assert_eq!(ProcessState::from_letter('Z'), ProcessState::Zombie);
    /// assert_eq!(ProcessState::from_letter('I'), ProcessState::Other('I'));
    /// ```
    pub fn from_letter(letter: char) -> Self
    {
        match letter {
            'R' => ProcessState::Running,
            'S' => ProcessState::Sleeping,
            'D' => ProcessState::Waiting,
            'Z' => ProcessState::Zombie,
            'T' | 't' => ProcessState::Stopped,
            'X' | 'x' => ProcessState::Dead,
            other => ProcessState::Other(other),
        }
    }

    /// The state letter this variant was parsed from
    pub fn letter(self) -> char
    {
        match self {
            ProcessState::Running => 'R',
            ProcessState::Sleeping => 'S',
            ProcessState::Waiting => 'D',
            ProcessState::Zombie => 'Z',
            ProcessState::Stopped => 'T',
            ProcessState::Dead => 'X',
            ProcessState::Other(c) => c,
        }
    }
}

impl fmt::Display for ProcessState
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.letter())
    }
}
