//! Leak/zombie fixture
//!
//! Creates a pipe, forks, and lets the child exit without closing anything.
//! The parent closes only the read end, leaves the child unreaped for two
//! seconds, then reaps it and exits 0. Nothing is written to stdout.
//!
//! Arguments are ignored.

use std::process;

use husk_core::fixture::LeakZombieFixture;
use husk_utils::{debug, error, init_logging};

fn main()
{
    let _guard = match init_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    match LeakZombieFixture::new().run() {
        // The child's status is deliberately not acted on
        Ok(report) => debug!(?report, "fixture finished"),
        Err(e) => {
            error!(error = %e, "fixture failed");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
