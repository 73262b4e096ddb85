//! # Process Inspection
//!
//! Read-only snapshots of `/proc/<pid>`: scheduler state, parent and open
//! descriptors. This is how the fixtures' leaks and zombie are checked from
//! the outside.
//!
//! Linux only. Nothing here attaches to, stops or modifies a process.
//!
//! ## Example
//!
//! ```rust,no_run
//! use husk_core::inspect::{children_of, ProcessSnapshot};
//! use husk_core::types::ProcessId;
//!
//! let me = ProcessSnapshot::capture(ProcessId::current())?;
//! println!("{} open descriptors", me.descriptors.len());
//!
//! for child in children_of(me.pid)? {
//!     if child.is_zombie() {
//!         println!("unreaped child {}", child.pid);
//!     }
//! }
//! # Ok::<(), husk_core::error::HuskError>(())
//! ```

use std::os::fd::RawFd;
use std::path::PathBuf;

use procfs::process::{FDTarget, Process};
use tracing::trace;

use crate::error::HuskResult;
use crate::types::{ProcessId, ProcessState};

/// What an open descriptor refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorTarget
{
    /// Either end of a pipe, identified by the pipe's inode
    Pipe(u64),
    /// A socket inode
    Socket(u64),
    /// A regular path (files, ttys, `/dev/null`, ...)
    Path(PathBuf),
    /// Anything else, as the kernel prints it
    Other(String),
}

/// One entry of `/proc/<pid>/fd`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDescriptor
{
    /// Descriptor number
    pub fd: RawFd,
    /// What it points at
    pub target: DescriptorTarget,
}

impl From<FDTarget> for DescriptorTarget
{
    fn from(target: FDTarget) -> Self
    {
        match target {
            FDTarget::Pipe(inode) => DescriptorTarget::Pipe(inode),
            FDTarget::Socket(inode) => DescriptorTarget::Socket(inode),
            FDTarget::Path(path) => DescriptorTarget::Path(path),
            other => DescriptorTarget::Other(format!("{other:?}")),
        }
    }
}

/// Point-in-time view of one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot
{
    /// The process
    pub pid: ProcessId,
    /// Its parent at capture time
    pub parent: ProcessId,
    /// Kernel scheduler state
    pub state: ProcessState,
    /// Short command name (`comm`)
    pub command: String,
    /// Open descriptors, sorted by number; always empty for zombies
    pub descriptors: Vec<OpenDescriptor>,
}

impl ProcessSnapshot
{
    /// Read `/proc/<pid>/stat` and `/proc/<pid>/fd`
    ///
    /// ## Errors
    ///
    /// [`crate::HuskError::Inspect`] if the process doesn't exist or its
    /// entries can't be read (another user's process, for instance).
    pub fn capture(pid: ProcessId) -> HuskResult<Self>
    {
        #[allow(clippy::cast_possible_wrap)]
        let process = Process::new(pid.0 as i32)?;
        Self::from_process(&process)
    }

    fn from_process(process: &Process) -> HuskResult<Self>
    {
        let stat = process.stat()?;
        let state = ProcessState::from_letter(stat.state);

        // A zombie has already released its file table
        let mut descriptors = if state == ProcessState::Zombie {
            Vec::new()
        } else {
            process
                .fd()?
                .filter_map(Result::ok)
                .map(|info| OpenDescriptor {
                    fd: info.fd,
                    target: info.target.into(),
                })
                .collect()
        };
        descriptors.sort_by_key(|d| d.fd);

        trace!(pid = stat.pid, %state, fds = descriptors.len(), "captured process snapshot");

        Ok(ProcessSnapshot {
            pid: ProcessId(stat.pid.unsigned_abs()),
            parent: ProcessId(stat.ppid.unsigned_abs()),
            state,
            command: stat.comm,
            descriptors,
        })
    }

    /// Terminated but not yet reaped
    pub fn is_zombie(&self) -> bool
    {
        self.state == ProcessState::Zombie
    }

    /// The entry for descriptor `fd`, if open
    pub fn descriptor(&self, fd: RawFd) -> Option<&OpenDescriptor>
    {
        self.descriptors.iter().find(|d| d.fd == fd)
    }

    /// Whether descriptor `fd` is open
    pub fn has_descriptor(&self, fd: RawFd) -> bool
    {
        self.descriptor(fd).is_some()
    }

    /// All descriptors that are pipe ends
    pub fn pipe_descriptors(&self) -> impl Iterator<Item = &OpenDescriptor>
    {
        self.descriptors
            .iter()
            .filter(|d| matches!(d.target, DescriptorTarget::Pipe(_)))
    }
}

/// Snapshots of every current child of `parent`
///
/// Processes that disappear while the table is being walked are skipped.
///
/// ## Errors
///
/// [`crate::HuskError::Inspect`] if `/proc` itself can't be listed.
pub fn children_of(parent: ProcessId) -> HuskResult<Vec<ProcessSnapshot>>
{
    // Only matching processes get their fd table read
    let children = procfs::process::all_processes()?
        .filter_map(Result::ok)
        .filter(|process| {
            process
                .stat()
                .is_ok_and(|stat| ProcessId(stat.ppid.unsigned_abs()) == parent)
        })
        .filter_map(|process| ProcessSnapshot::from_process(&process).ok())
        .filter(|snapshot| snapshot.parent == parent)
        .collect();
    Ok(children)
}

#[cfg(test)]
mod tests
{
    use std::os::fd::AsRawFd;

    use super::*;

    #[test]
    fn test_capture_self()
    {
        let me = ProcessSnapshot::capture(ProcessId::current()).unwrap();
        assert_eq!(me.pid, ProcessId::current());
        assert!(!me.is_zombie());
        assert!(me.descriptors.windows(2).all(|w| w[0].fd < w[1].fd));
    }

    #[test]
    fn test_open_pipe_is_visible()
    {
        let (read, write) = nix::unistd::pipe().unwrap();
        let me = ProcessSnapshot::capture(ProcessId::current()).unwrap();

        let read_target = &me.descriptor(read.as_raw_fd()).unwrap().target;
        let write_target = &me.descriptor(write.as_raw_fd()).unwrap().target;
        assert!(matches!(read_target, DescriptorTarget::Pipe(_)));
        // Both ends name the same pipe inode
        assert_eq!(read_target, write_target);
    }

    #[test]
    fn test_children_of_finds_only_our_child()
    {
        let mut child = std::process::Command::new("sleep")
            .arg("2")
            .spawn()
            .expect("Failed to spawn sleep");
        let child_pid = ProcessId::from(child.id());

        let children = children_of(ProcessId::current()).unwrap();
        child.kill().unwrap();
        child.wait().unwrap();

        assert!(children.iter().any(|c| c.pid == child_pid));
        assert!(children.iter().all(|c| c.parent == ProcessId::current()));
    }

    #[test]
    fn test_missing_process_is_an_error()
    {
        // Above the default pid_max, never allocated
        assert!(ProcessSnapshot::capture(ProcessId(u32::MAX >> 1)).is_err());
    }
}
