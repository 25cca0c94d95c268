//! cli::commands::serve
//!
//! Run the HTTP API.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{load_config, open_store, report_builder, Context};
use crate::api::{self, AppState};
use crate::ui::output;

/// Serve the API until interrupted.
pub fn serve(ctx: &Context, bind: Option<&str>, data: Option<&Path>) -> Result<()> {
    let config = load_config(ctx)?;

    let bind = bind.unwrap_or_else(|| config.bind());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("'{}' is not a socket address", bind))?;

    let store = open_store(&config, data)?;
    output::debug(
        format!("loaded {} inventories", store.inventory_count()),
        ctx.verbosity(),
    );
    let state = AppState::new(report_builder(&config, store));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(api::serve(addr, state))
        .with_context(|| format!("Failed to serve on {}", addr))
}
