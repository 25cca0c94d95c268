//! cli
//!
//! Command-line interface for `cc-cdp`.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that build a [`crate::report::CdpReportBuilder`] from the
//! loaded configuration.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;

/// Run the CLI application with already parsed arguments.
///
/// This is the main entry point called from `main.rs`, which parses first
/// so logging can be set up from the global flags.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = commands::Context {
        config: cli.config.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
