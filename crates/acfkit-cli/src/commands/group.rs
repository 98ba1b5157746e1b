//! Field group inspection commands

use acfkit_core::Config;
use acfkit_core::export::render_json;
use anyhow::{Context, Result};

/// List all groups
pub fn list(config_path: &str) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let groups = config
        .load_groups()
        .context("Failed to load field groups")?;

    tracing::info!("Listing {} groups", groups.len());
    for group in &groups {
        println!("group_{}\t{}", group.group_key(), group.title());
    }
    Ok(())
}

/// Print one built group
pub fn show(config_path: &str, key: &str) -> Result<()> {
    tracing::info!("Showing group: {}", key);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let group = config
        .load_group(key)
        .with_context(|| format!("Group not found: {}", key))?;
    let built = group
        .build()
        .with_context(|| format!("Failed to build group '{}'", group.title()))?;

    println!("{}", render_json(&built.to_value(), true)?);
    Ok(())
}
