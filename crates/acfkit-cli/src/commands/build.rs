//! Build field groups to ACF local JSON

use acfkit_core::export::{render_json, write_group_json};
use acfkit_core::{Config, FieldGroup};
use anyhow::{Context, Result};

/// Run the build command
pub fn run(config_path: &str, group: Option<&str>, stdout: bool) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;

    let groups: Vec<FieldGroup> = match group {
        Some(key) => vec![
            config
                .load_group(key)
                .with_context(|| format!("Group not found: {}", key))?,
        ],
        None => config.load_groups().context("Failed to load field groups")?,
    };

    if groups.is_empty() {
        tracing::warn!("No field groups found in {}", config.groups_dir().display());
        return Ok(());
    }

    let output_dir = config.output_dir();
    let pretty = config.project.output.pretty;

    for definition in &groups {
        let built = definition
            .build()
            .with_context(|| format!("Failed to build group '{}'", definition.title()))?;

        if stdout {
            println!("{}", render_json(&built.to_value(), pretty)?);
            continue;
        }

        let path = write_group_json(&built, &output_dir, pretty)
            .with_context(|| format!("Failed to write group '{}'", built.key()))?;
        tracing::info!(
            "✓ {} ({} fields) -> {}",
            built.key(),
            built.field_count(),
            path.display()
        );
    }

    tracing::info!("Built {} group(s)", groups.len());
    Ok(())
}
