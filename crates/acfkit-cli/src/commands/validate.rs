//! Validate configuration command

use acfkit_core::Config;
use anyhow::{Context, Result};

/// Run the validate command
pub fn run(config_path: &str) -> Result<()> {
    tracing::info!("Validating configuration: {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;

    tracing::info!("✓ Project: {}", config.project.name);
    tracing::info!("✓ Version: {}", config.project.version);

    let groups = config
        .load_groups()
        .context("Failed to load field groups")?;

    let mut fields = 0;
    for definition in &groups {
        let built = definition
            .build()
            .with_context(|| format!("Invalid group '{}'", definition.title()))?;
        fields += built.field_count();
        tracing::info!("✓ Group: {} ({} fields)", built.key(), built.field_count());
    }

    tracing::info!(
        "✓ Configuration is valid ({} groups, {} fields)",
        groups.len(),
        fields
    );
    Ok(())
}
