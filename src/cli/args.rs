//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of the default locations
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cc-cdp - CityCatalyst emissions reporting to CDP
#[derive(Parser, Debug)]
#[command(name = "cc-cdp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    #[command(
        name = "serve",
        long_about = "Run the HTTP API.\n\n\
            Serves POST /api/v0/inventory/{id}/cdp, the matching preview route, \
            and /health. Inventories are read from a JSON fixture file.",
        after_help = "\
EXAMPLES:
    # Serve on the configured address
    cc-cdp serve --data inventories.json

    # Override the listen address
    cc-cdp serve --bind 0.0.0.0:8080 --data inventories.json"
    )]
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Inventory fixture file (overrides config)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },

    /// Submit an inventory's emissions to CDP
    #[command(
        name = "submit",
        long_about = "Submit an inventory's emissions to CDP.\n\n\
            Resolves the city, fetches the questionnaire, answers the inventory \
            question and submits the emissions matrix. Requires mode = \"test\".",
        after_help = "\
EXAMPLES:
    CDP_MODE=test CDP_API_URL=https://cdp.example.org cc-cdp submit \\
        --inventory 1c0e6c52-4f7b-4b4e-9f56-2b0c0f9c2a11 --data inventories.json"
    )]
    Submit {
        /// Inventory id
        #[arg(long, value_name = "ID")]
        inventory: String,

        /// Inventory fixture file (overrides config)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },

    /// Show the totals that would be submitted
    Preview {
        /// Inventory id
        #[arg(long, value_name = "ID")]
        inventory: String,

        /// Inventory fixture file (overrides config)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List emissions categories and their GPC reference numbers
    Categories {
        /// Show only this category (slug)
        category: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    cc-cdp completion bash >> ~/.bashrc

    # Zsh
    cc-cdp completion zsh > ~/.zfunc/_cc-cdp"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration (token redacted)
    Show,
    /// Print the path of the config file in use
    Path,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
