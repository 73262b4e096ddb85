//! Tests for error handling

use husk_core::error::{HuskError, HuskResult};
use husk_core::types::ProcessId;
use nix::errno::Errno;

#[test]
fn test_usage_error_display()
{
    let error = HuskError::Usage("expected 1 argument, got 0".to_string());
    let message = format!("{}", error);
    assert!(message.contains("Usage"));
    assert!(message.contains("got 0"));
}

#[test]
fn test_invalid_seconds_display()
{
    let error = HuskError::InvalidSeconds("abc".to_string());
    let message = format!("{}", error);
    assert!(message.contains("'abc'"));
    assert!(message.contains("positive integer"));
}

#[test]
fn test_reap_failed_names_child()
{
    let error = HuskError::ReapFailed {
        pid: ProcessId::from(4242),
        source: Errno::ECHILD,
    };
    let message = format!("{}", error);
    assert!(message.contains("4242"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_syscall_errors_keep_errno()
{
    let error = HuskError::ForkFailed(Errno::EAGAIN);
    assert!(format!("{}", error).contains("duplicate process"));
    assert!(matches!(error, HuskError::ForkFailed(Errno::EAGAIN)));

    let error = HuskError::ChannelFailed(Errno::EMFILE);
    assert!(format!("{}", error).contains("channel"));
}

#[test]
fn test_io_error_conversion()
{
    let io = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
    let error: HuskError = io.into();
    assert!(matches!(error, HuskError::Io(_)));
}

#[test]
fn test_result_type()
{
    // Test that Result type is properly aliased
    let _result: HuskResult<()> = Ok(());
    let _error_result: HuskResult<()> = Err(HuskError::InvalidSeconds("0".to_string()));
}
