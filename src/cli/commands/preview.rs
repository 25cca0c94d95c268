//! cli::commands::preview
//!
//! Print the per-category totals for an inventory without contacting CDP.

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{load_config, open_store, parse_inventory, report_builder, Context};
use crate::ui::output;

/// Print totals as a table, or as JSON with `json`.
pub fn preview(ctx: &Context, inventory: &str, data: Option<&Path>, json: bool) -> Result<()> {
    let inventory_id = parse_inventory(inventory)?;
    let config = load_config(ctx)?;
    let builder = report_builder(&config, open_store(&config, data)?);

    let rt = tokio::runtime::Runtime::new()?;
    let totals = rt.block_on(builder.preview(&inventory_id))?;

    if json {
        let text = serde_json::to_string_pretty(&totals).context("Failed to render totals")?;
        println!("{}", text);
        return Ok(());
    }

    let rows: Vec<(String, String)> = totals
        .iter()
        .map(|(category, total)| (category.slug().to_string(), total.to_string()))
        .collect();
    println!("{}", output::format_table(&rows));
    Ok(())
}
