use anyhow::{Context as _, Result};

use super::Context;

pub fn show(ctx: &Context) -> Result<()> {
    let rendered = toml::to_string_pretty(&ctx.config.redacted())
        .context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}
