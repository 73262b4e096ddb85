//! Validated countdown duration.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use std::time::Duration;

use crate::error::HuskError;

/// Number of seconds the countdown emitter runs for
///
/// Always strictly positive: the only way to build one is from a non-zero
/// value, so the emitter never has to re-check its input.
///
/// ## Parsing
///
/// The operand must be a plain decimal integer that fits in a `u64` and is
/// greater than zero. Anything else (`0`, `-3`, `3s`, ` 3`, an empty string)
/// is rejected with [`HuskError::InvalidSeconds`].
///
/// ```rust
/// use husk_core::types::Seconds;
///
/// let secs: Seconds = "3".parse()?;
/// assert_eq!(secs.get(), 3);
/// assert!("0".parse::<Seconds>().is_err());
/// # Ok::<(), husk_core::error::HuskError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Seconds(NonZeroU64);

impl Seconds
{
    /// Build from a raw count, `None` for zero
    pub fn new(count: u64) -> Option<Self>
    {
        NonZeroU64::new(count).map(Seconds)
    }

    /// Number of seconds as a plain integer
    pub fn get(self) -> u64
    {
        self.0.get()
    }

    /// Wall-clock length of the whole countdown
    pub fn as_duration(self) -> Duration
    {
        Duration::from_secs(self.get())
    }
}

impl From<NonZeroU64> for Seconds
{
    fn from(value: NonZeroU64) -> Self
    {
        Seconds(value)
    }
}

impl FromStr for Seconds
{
    type Err = HuskError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        s.parse::<u64>()
            .ok()
            .and_then(Seconds::new)
            .ok_or_else(|| HuskError::InvalidSeconds(s.to_string()))
    }
}

impl fmt::Display for Seconds
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_parse_positive()
    {
        assert_eq!("1".parse::<Seconds>().unwrap().get(), 1);
        assert_eq!("42".parse::<Seconds>().unwrap().get(), 42);
        assert_eq!("007".parse::<Seconds>().unwrap().get(), 7);
    }

    #[test]
    fn test_parse_rejects_zero_and_garbage()
    {
        for bad in ["0", "", "-1", "abc", "3s", " 3", "1.5", "99999999999999999999999"] {
            match bad.parse::<Seconds>() {
                Err(HuskError::InvalidSeconds(raw)) => assert_eq!(raw, bad),
                other => panic!("expected InvalidSeconds for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_new_zero_is_none()
    {
        assert!(Seconds::new(0).is_none());
        assert_eq!(Seconds::new(5).map(Seconds::get), Some(5));
    }

    #[test]
    fn test_as_duration()
    {
        assert_eq!(Seconds::new(3).unwrap().as_duration(), Duration::from_secs(3));
    }
}
