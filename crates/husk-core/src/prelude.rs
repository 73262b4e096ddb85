//! Common module for library exports

pub use crate::countdown::{parse_args, usage, Countdown};
pub use crate::error::{HuskError, HuskResult};
pub use crate::fixture::{ChildExit, FixtureReport, LeakZombieFixture, StageObserver};
#[cfg(target_os = "linux")]
pub use crate::inspect::{children_of, DescriptorTarget, ProcessSnapshot};
pub use crate::pause::{Pause, SystemPause};
pub use crate::types::{FixtureStage, ProcessId, ProcessState, Seconds};
