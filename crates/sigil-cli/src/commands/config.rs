//! `config` command: inspect the resolved configuration.

use anyhow::{Result, anyhow};
use sigil_config::loader::default_config_path;
use sigil_config::{ResolvedConfig, ShowFormat};

/// Print the resolved configuration with source annotations.
pub(crate) fn show(resolved: &ResolvedConfig, format: &str, section: Option<&str>) -> Result<()> {
    let format = match format {
        "toml" => ShowFormat::Toml,
        "json" => ShowFormat::Json,
        other => return Err(anyhow!("unknown format '{other}'; expected toml or json")),
    };
    let output = resolved.show(format, section).map_err(|_| match section {
        Some(name) => anyhow!("no such config section '{name}'"),
        None => anyhow!("failed to render configuration"),
    })?;
    println!("{output}");
    Ok(())
}

/// Print the file and environment variables consulted during loading.
pub(crate) fn paths() -> Result<()> {
    println!("config file: {}", default_config_path()?.display());
    println!("environment: {}", sigil_config::env::supported_vars().join(", "));
    Ok(())
}
