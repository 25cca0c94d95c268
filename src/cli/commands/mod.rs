//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration and validates command-specific arguments
//! 2. Builds the store, reporting service and report builder
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! `serve`, `submit` and `preview` do network or store I/O and are async.
//! Their sync entry points create a tokio runtime and block on the async
//! implementation.

mod categories;
mod completion;
mod config_cmd;
mod preview;
mod serve;
mod submit;

pub use categories::categories;
pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show};
pub use preview::preview;
pub use serve::serve;
pub use submit::submit;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};

use crate::cli::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::core::types::InventoryId;
use crate::report::CdpReportBuilder;
use crate::reporting::create_reporting_service;
use crate::store::MemoryInventoryStore;
use crate::ui::output::{self, Verbosity};

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file (`--config`)
    pub config: Option<PathBuf>,
    /// Debug output
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Serve { bind, data } => serve::serve(ctx, bind.as_deref(), data.as_deref()),
        Command::Submit { inventory, data } => submit::submit(ctx, &inventory, data.as_deref()),
        Command::Preview {
            inventory,
            data,
            json,
        } => preview::preview(ctx, &inventory, data.as_deref(), json),
        Command::Categories { category } => categories::categories(ctx, category.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load configuration, printing any load warnings.
fn load_config(ctx: &Context) -> Result<Config> {
    let result = Config::load(ctx.config.as_deref()).context("Failed to load config")?;
    for warning in &result.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            ctx.verbosity(),
        );
    }
    output::debug(
        format!(
            "config: {}",
            result
                .config
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string())
        ),
        ctx.verbosity(),
    );
    Ok(result.config)
}

/// Load the inventory store from `data`, falling back to the configured path.
fn open_store(config: &Config, data: Option<&Path>) -> Result<MemoryInventoryStore> {
    let path = data
        .or_else(|| config.data_path())
        .ok_or_else(|| anyhow!("No inventory data. Pass --data or set [server] data in config."))?;
    Ok(MemoryInventoryStore::load(path)?)
}

/// Build the report builder described by `config`.
fn report_builder(config: &Config, store: MemoryInventoryStore) -> CdpReportBuilder {
    CdpReportBuilder::new(
        config.mode(),
        Arc::new(store),
        create_reporting_service(config),
    )
    .with_layout(config.layout())
    .with_timeout(config.timeout())
}

fn parse_inventory(raw: &str) -> Result<InventoryId> {
    raw.parse::<InventoryId>()
        .with_context(|| format!("'{}' is not an inventory id", raw))
}
