//! Initialize a new acfkit project

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Run the init command
pub fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Create directory if it doesn't exist
    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    // Get absolute path for deriving name
    let abs_path = project_dir.canonicalize()?;

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    // Check if already initialized
    if project_dir.join("acfkit.yaml").exists() {
        anyhow::bail!(
            "Directory '{}' already contains an acfkit.yaml",
            project_dir.display()
        );
    }

    tracing::info!("Creating new acfkit project: {}", project_name);

    fs::create_dir_all(project_dir.join("groups"))?;

    let config = format!(
        r#"# acfkit Project Configuration
name: {project_name}
version: "0.1.0"

# Field group definitions, one group per file
groups_dir: groups

# ACF loads local JSON from <theme>/acf-json
output:
  dir: acf-json
  pretty: true
"#
    );
    fs::write(project_dir.join("acfkit.yaml"), config)?;

    let example_group = r#"# Example field group
title: Employee
location:
  - - param: post_type
      operator: "=="
      value: employee

fields:
  - type: text
    label: Name
    required: true

  - type: true_false
    label: Has profile page

  - type: page_link
    label: Profile page
    post_type: [page]
    allow_null: true
    conditional_logic:
      - - field: has_profile_page
          operator: "=="
          value: 1

  - type: repeater
    label: Links
    button_label: Add link
    sub_fields:
      - type: text
        label: Title
      - type: url
        label: Address
"#;
    fs::write(project_dir.join("groups/employee.yaml"), example_group)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("");
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  acfkit validate    # Check field groups");
    tracing::info!("  acfkit build       # Write acf-json/");

    Ok(())
}
