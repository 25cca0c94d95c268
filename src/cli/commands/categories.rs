//! categories command - List emissions categories and their reference numbers

use super::Context;
use crate::core::catalog::{reference_numbers, Category};
use crate::ui::output::{self, format_list};
use anyhow::{anyhow, Result};

/// Print each category's slug, label and GPC reference numbers.
pub fn categories(ctx: &Context, only: Option<&str>) -> Result<()> {
    let selected: Vec<Category> = match only {
        Some(slug) => vec![slug.parse::<Category>().map_err(|e| anyhow!(e))?],
        None => Category::ALL.to_vec(),
    };

    let verbosity = ctx.verbosity();
    for category in selected {
        let refnos = reference_numbers(category);
        if ctx.quiet {
            println!("{}\t{}", category.slug(), refnos.join(","));
            continue;
        }
        output::print(
            format!(
                "{} - {} ({} reference numbers)",
                category.slug(),
                category.label(),
                refnos.len()
            ),
            verbosity,
        );
        output::print(format_list(refnos, "    "), verbosity);
    }
    Ok(())
}
