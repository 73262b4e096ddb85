//! Parent-side lifecycle of the leak/zombie fixture.

use std::fmt;

/// Where the leak/zombie fixture's parent currently is
///
/// The parent walks these stages strictly in declaration order, exactly once
/// each. Nothing is retried and no stage is skipped on the success path; a
/// failing system call ends the run with an error instead.
///
/// ## State Transitions
///
/// - `ChannelCreated` → `Duplicated`: `fork()` returned in the parent
/// - `Duplicated` → `ReadEndReleased`: the read end was closed, the write end was leaked
/// - `ReadEndReleased` → `Sleeping`: the zombie window opens
/// - `Sleeping` → `ChildReaped`: `waitpid()` collected the child
/// - `ChildReaped` → `Terminated`: the fixture is about to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FixtureStage
{
    /// The pipe exists; both ends are open in this process only
    ChannelCreated,
    /// The child exists and inherited both ends
    Duplicated,
    /// The parent closed the read end and still holds the write end
    ReadEndReleased,
    /// The parent is paused; the child has exited (or is about to) and is not reaped
    Sleeping,
    /// The child's exit status was collected
    ChildReaped,
    /// The run is complete
    Terminated,
}

impl FixtureStage
{
    /// Every stage, in transition order
    pub const ALL: [FixtureStage; 6] = [
        FixtureStage::ChannelCreated,
        FixtureStage::Duplicated,
        FixtureStage::ReadEndReleased,
        FixtureStage::Sleeping,
        FixtureStage::ChildReaped,
        FixtureStage::Terminated,
    ];

    /// The stage that follows this one, `None` after `Terminated`
    pub fn next(self) -> Option<FixtureStage>
    {
        match self {
            FixtureStage::ChannelCreated => Some(FixtureStage::Duplicated),
            FixtureStage::Duplicated => Some(FixtureStage::ReadEndReleased),
            FixtureStage::ReadEndReleased => Some(FixtureStage::Sleeping),
            FixtureStage::Sleeping => Some(FixtureStage::ChildReaped),
            FixtureStage::ChildReaped => Some(FixtureStage::Terminated),
            FixtureStage::Terminated => None,
        }
    }
}

impl fmt::Display for FixtureStage
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self {
            FixtureStage::ChannelCreated => "created channel",
            FixtureStage::Duplicated => "duplicated",
            FixtureStage::ReadEndReleased => "one endpoint released",
            FixtureStage::Sleeping => "sleeping",
            FixtureStage::ChildReaped => "child reaped",
            FixtureStage::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
