//! config command - Show the effective configuration

use super::{load_config, Context};
use anyhow::{Context as _, Result};

const REDACTED: &str = "********";

/// Print the effective configuration as TOML, with the API token redacted.
pub fn show(ctx: &Context) -> Result<()> {
    let config = load_config(ctx)?;

    let mut file = config.file.clone();
    if file.api_token.is_some() {
        file.api_token = Some(REDACTED.to_string());
    }
    file.mode = Some(config.mode());
    file.timeout_secs = Some(config.timeout().as_secs());

    let text = toml::to_string_pretty(&file).context("Failed to render config")?;
    print!("{}", text);
    Ok(())
}

/// Print the path of the config file in use.
pub fn path(ctx: &Context) -> Result<()> {
    let config = load_config(ctx)?;
    match config.path() {
        Some(path) => println!("{}", path.display()),
        None => {
            if !ctx.quiet {
                println!("(no config file; using defaults)");
            }
        }
    }
    Ok(())
}
