//! Build script for husk-core
//!
//! This script checks system requirements before compilation:
//! - Minimum Rust version (`OwnedFd` and the nix 0.29 API need Rust 1.69+)
//! - Target family (the fixtures are built on `fork(2)` and `pipe(2)`)
//!
//! ## Requirements
//!
//! - **Rust**: 1.69.0 or newer
//! - **Target**: any Unix (Linux, macOS, the BSDs)

use std::env;

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(rustc_version) = rustc_version::version() {
        let min_rust_version = rustc_version::Version::new(1, 69, 0);

        if rustc_version < min_rust_version {
            panic!("husk-core requires Rust {min_rust_version} or newer, found {rustc_version}");
        }
    } else {
        // If we can't get version (e.g., in some build environments), just warn
        println!("cargo:warning=could not verify Rust version");
    }

    // Host cfg! would describe the build machine, not the target
    let family = env::var("CARGO_CFG_TARGET_FAMILY").unwrap_or_default();
    if !family.split(',').any(|f| f == "unix") {
        panic!("husk-core needs a Unix target (fork/pipe/waitpid), found target family '{family}'");
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "linux" {
        println!("cargo:warning=/proc inspection helpers are only built on Linux (target_os = {target_os})");
    }
}
