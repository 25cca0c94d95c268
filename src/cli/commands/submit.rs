//! cli::commands::submit
//!
//! Submit one inventory to CDP from the command line.

use std::path::Path;

use anyhow::Result;

use super::{load_config, open_store, parse_inventory, report_builder, Context};
use crate::core::types::InventoryId;
use crate::report::CdpReportBuilder;
use crate::ui::output;

/// Submit `inventory` and report the outcome.
pub fn submit(ctx: &Context, inventory: &str, data: Option<&Path>) -> Result<()> {
    let inventory_id = parse_inventory(inventory)?;
    let config = load_config(ctx)?;
    let builder = report_builder(&config, open_store(&config, data)?);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(submit_async(ctx, &builder, &inventory_id))
}

async fn submit_async(
    ctx: &Context,
    builder: &CdpReportBuilder,
    inventory_id: &InventoryId,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    output::debug(format!("builder: {:?}", builder), verbosity);

    let report = builder.submit(inventory_id).await?;

    output::success(
        format!(
            "Submitted inventory {} to CDP city {} ({} rows, layout {})",
            report.inventory_id,
            report.city_id,
            report.totals.len(),
            report.schema_version
        ),
        verbosity,
    );
    Ok(())
}
