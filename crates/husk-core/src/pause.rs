//! # Pausing
//!
//! Both fixtures pace themselves with fixed real-time pauses. The pause is a
//! trait so the emitter and the fixture can be driven without waiting in
//! tests.

use std::time::Duration;

use tracing::debug;

/// Something that suspends the caller for (roughly) a given duration
pub trait Pause
{
    /// Suspend for `duration`. May return early; callers never retry.
    fn pause(&mut self, duration: Duration);
}

impl<P: Pause + ?Sized> Pause for &mut P
{
    fn pause(&mut self, duration: Duration)
    {
        (**self).pause(duration);
    }
}

/// Process-level `sleep(3)`
///
/// Whole seconds go through `nix::unistd::sleep`, which returns early when a
/// signal is delivered and reports the unslept remainder. The remainder is
/// logged and dropped. Sub-second parts use `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPause;

impl Pause for SystemPause
{
    fn pause(&mut self, duration: Duration)
    {
        let whole = u32::try_from(duration.as_secs()).unwrap_or(u32::MAX);
        if whole > 0 {
            let unslept = nix::unistd::sleep(whole);
            if unslept > 0 {
                debug!(requested = whole, unslept, "sleep interrupted, not retrying");
                return;
            }
        }

        let frac = Duration::from_nanos(u64::from(duration.subsec_nanos()));
        if !frac.is_zero() {
            std::thread::sleep(frac);
        }
    }
}

/// Records requested pauses instead of sleeping
///
/// Useful for driving the fixtures in tests.
///
/// ```rust
/// use std::time::Duration;
///
/// use husk_core::pause::{Pause, RecordingPause};
///
/// let mut pause = RecordingPause::default();
/// pause.pause(Duration::from_secs(1));
/// assert_eq!(pause.requested(), &[Duration::from_secs(1)]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingPause
{
    requested: Vec<Duration>,
}

impl RecordingPause
{
    /// Pauses requested so far, in order
    pub fn requested(&self) -> &[Duration]
    {
        &self.requested
    }

    /// Sum of all requested pauses
    pub fn total(&self) -> Duration
    {
        self.requested.iter().sum()
    }
}

impl Pause for RecordingPause
{
    fn pause(&mut self, duration: Duration)
    {
        self.requested.push(duration);
    }
}

#[cfg(test)]
mod tests
{
    use std::time::Instant;

    use super::*;

    #[test]
    fn test_recording_pause_total()
    {
        let mut pause = RecordingPause::default();
        pause.pause(Duration::from_secs(1));
        pause.pause(Duration::from_millis(500));
        assert_eq!(pause.requested().len(), 2);
        assert_eq!(pause.total(), Duration::from_millis(1500));
    }

    #[test]
    fn test_pause_through_mut_ref()
    {
        let mut pause = RecordingPause::default();
        {
            let mut by_ref = &mut pause;
            by_ref.pause(Duration::from_secs(2));
        }
        assert_eq!(pause.requested(), &[Duration::from_secs(2)]);
    }

    #[test]
    fn test_system_pause_sub_second()
    {
        let start = Instant::now();
        SystemPause.pause(Duration::from_millis(50));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
