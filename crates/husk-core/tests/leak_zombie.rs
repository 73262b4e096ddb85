//! In-process run of the leak/zombie fixture, observed through `/proc`
//!
//! Keep this the only test in the binary: it checks descriptor numbers of
//! the test process, which other tests running concurrently could reuse.

#![cfg(target_os = "linux")]

use std::thread;
use std::time::Duration;

use husk_core::fixture::{ChildExit, FixtureReport, LeakZombieFixture, ZOMBIE_WINDOW};
use husk_core::inspect::{children_of, DescriptorTarget, ProcessSnapshot};
use husk_core::pause::RecordingPause;
use husk_core::types::{FixtureStage, ProcessId};

/// What the observer saw while the zombie window was open
struct WindowView
{
    child: ProcessSnapshot,
    parent: ProcessSnapshot,
}

fn wait_for_zombie(pid: ProcessId) -> ProcessSnapshot
{
    for _ in 0..100 {
        let snapshot = ProcessSnapshot::capture(pid).expect("unreaped child must stay in /proc");
        if snapshot.is_zombie() {
            return snapshot;
        }
        thread::sleep(Duration::from_millis(20));
    }
    panic!("child {pid} never became a zombie");
}

#[test]
fn test_fixture_leaks_and_leaves_zombie()
{
    let me = ProcessId::current();
    let mut stages = Vec::new();
    let mut window = None;
    let mut pause = RecordingPause::default();

    let report = LeakZombieFixture::new()
        .with_pause(&mut pause)
        .with_observer(|stage: FixtureStage, report: &FixtureReport| {
            stages.push(stage);
            if stage == FixtureStage::Sleeping {
                let child = report.child.expect("child exists once sleeping");
                window = Some(WindowView {
                    child: wait_for_zombie(child),
                    parent: ProcessSnapshot::capture(me).unwrap(),
                });
            }
        })
        .run()
        .unwrap();

    // Every stage, once, in order, and a single fixed window
    assert_eq!(stages, FixtureStage::ALL);
    assert_eq!(pause.requested(), &[ZOMBIE_WINDOW]);

    // During the window: an unreaped child of ours
    let window = window.expect("observer ran at the sleeping stage");
    let child = report.child.unwrap();
    assert_eq!(window.child.pid, child);
    assert_eq!(window.child.parent, me);
    assert!(window.child.is_zombie());
    assert!(window.child.descriptors.is_empty());

    // ...while we still hold the write end and no longer the read end
    let write_end = window.parent.descriptor(report.write_fd).expect("write end leaked");
    assert!(matches!(write_end.target, DescriptorTarget::Pipe(_)));
    let read_end_same_pipe = window
        .parent
        .descriptor(report.read_fd)
        .is_some_and(|d| d.target == write_end.target);
    assert!(!read_end_same_pipe, "read end should have been closed");

    // Afterwards: reaped exactly once, exit status 0, gone from the table
    assert_eq!(report.reaped, Some(ChildExit::Exited(0)));
    assert!(children_of(me).unwrap().iter().all(|c| c.pid != child));
    assert!(nix::sys::wait::waitpid(child.as_pid(), None).is_err());

    // The write end outlives the run
    let after = ProcessSnapshot::capture(me).unwrap();
    assert!(after.has_descriptor(report.write_fd));
    assert_eq!(after.descriptor(report.write_fd), Some(write_end));
    nix::unistd::close(report.write_fd).unwrap();
}
