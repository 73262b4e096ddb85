//! Countdown emitter
//!
//! Prints `0` through `N-1`, one line per second, then exits 0.
//!
//! ```bash
//! countdown 3
//! ```
//!
//! Any argument problem (missing, extra, zero, not a number, a flag, `--`)
//! prints the usage line on stderr and exits 1. Diagnostics are off by
//! default; set `RUST_LOG=debug` to see them on stderr.

use std::{env, io, process};

use clap::Parser;
use husk_core::countdown::{parse_args, parse_seconds, usage, Countdown};
use husk_core::types::Seconds;
use husk_utils::{debug, error, init_logging};

/// Print an increasing counter once per second.
///
/// No help or version flags: every argument other than one positive integer
/// is a usage error.
#[derive(Parser, Debug)]
#[command(name = "countdown")]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(override_usage = "countdown <seconds to sleep>")]
struct Cli
{
    /// How many lines to print (and seconds to run); must be at least 1
    #[arg(value_name = "SECONDS", value_parser = parse_seconds)]
    seconds: Seconds,
}

fn main()
{
    let _guard = match init_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    let args: Vec<String> = env::args_os().map(|arg| arg.to_string_lossy().into_owned()).collect();
    let program = args.first().cloned().unwrap_or_else(|| "countdown".to_string());

    // parse_args owns the operand rules; clap only builds the typed Cli from
    // an argument vector already known to hold one positive integer
    let parsed = parse_args(&args)
        .map_err(|e| e.to_string())
        .and_then(|_| Cli::try_parse_from(&args).map_err(|e| e.to_string()));
    let cli = match parsed {
        Ok(cli) => cli,
        Err(reason) => {
            debug!(%reason, "rejected arguments");
            eprintln!("{}", usage(&program));
            process::exit(1);
        }
    };

    if let Err(e) = Countdown::new(cli.seconds).run(&mut io::stdout().lock()) {
        error!(error = %e, "countdown aborted");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
