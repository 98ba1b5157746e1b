//! Project configuration
//!
//! This module handles loading acfkit projects from disk.
//!
//! # Configuration Files
//!
//! - `acfkit.yaml` - Project root configuration
//! - `groups/*.yaml` - One field group per file

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::group::FieldGroup;

/// Name of the project file looked up in a project directory
pub const PROJECT_FILE: &str = "acfkit.yaml";

/// Root project configuration from `acfkit.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Directory holding group definitions, relative to the project root
    #[serde(default = "default_groups_dir")]
    pub groups_dir: String,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_groups_dir() -> String {
    "groups".to_string()
}

/// Where and how built groups are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, relative to the project root
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Pretty-print JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pretty: default_pretty(),
        }
    }
}

fn default_output_dir() -> String {
    "acf-json".to_string()
}

fn default_pretty() -> bool {
    true
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the project directory or `acfkit.yaml` file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-theme")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(PROJECT_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;
        if project.name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "project name must not be empty".to_string(),
            });
        }

        tracing::debug!(path = %config_path.display(), "loaded project configuration");
        Ok(Self { project, base_path })
    }

    /// Directory holding group definitions
    pub fn groups_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.groups_dir)
    }

    /// Directory built groups are written to
    pub fn output_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.output.dir)
    }

    /// Load all group definitions from the groups directory, sorted by path
    pub fn load_groups(&self) -> Result<Vec<FieldGroup>> {
        let groups_dir = self.groups_dir();
        if !groups_dir.exists() {
            return Ok(vec![]);
        }

        let mut entries: Vec<_> = std::fs::read_dir(&groups_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
            })
            .collect();
        entries.sort_by_key(|e| e.path());

        let mut groups = Vec::new();
        for entry in entries {
            let contents = std::fs::read_to_string(entry.path())?;
            let group: FieldGroup =
                serde_yaml::from_str(&contents).map_err(|e| Error::ConfigInvalid {
                    message: format!("{}: {}", entry.path().display(), e),
                })?;
            groups.push(group);
        }
        Ok(groups)
    }

    /// Load the group whose key (without `group_` prefix) is `key`
    pub fn load_group(&self, key: &str) -> Result<FieldGroup> {
        let wanted = crate::key::sanitize(key.trim_start_matches(crate::key::GROUP_PREFIX));
        self.load_groups()?
            .into_iter()
            .find(|group| group.group_key() == wanted)
            .ok_or_else(|| Error::ConfigInvalid {
                message: format!("group '{}' not found in {}", key, self.groups_dir().display()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: test-theme
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "test-theme");
        assert_eq!(config.version, "0.1.0");
        assert_eq!(config.groups_dir, "groups");
        assert_eq!(config.output.dir, "acf-json");
        assert!(config.output.pretty);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: test-theme
version: "1.0.0"
groups_dir: fields
output:
  dir: build/acf
  pretty: false
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.groups_dir, "fields");
        assert_eq!(config.output.dir, "build/acf");
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_groups_from_dir() {
        let dir = std::env::temp_dir().join("acfkit_test_groups");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("groups")).unwrap();
        std::fs::write(dir.join("acfkit.yaml"), "name: test\n").unwrap();
        std::fs::write(
            dir.join("groups/b.yaml"),
            "title: Office\nfields:\n  - type: text\n    label: Address\n",
        )
        .unwrap();
        std::fs::write(dir.join("groups/a.yml"), "title: Employee\n").unwrap();
        std::fs::write(dir.join("groups/notes.txt"), "ignored").unwrap();

        let config = Config::load(&dir).unwrap();
        let groups = config.load_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_key(), "employee");
        assert_eq!(groups[1].group_key(), "office");

        let office = config.load_group("group_office").unwrap();
        assert_eq!(office.title(), "Office");
        assert!(config.load_group("missing").is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_groups_dir() {
        let dir = std::env::temp_dir().join("acfkit_test_no_groups");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("acfkit.yaml"), "name: test\n").unwrap();

        let config = Config::load(&dir).unwrap();
        assert!(config.load_groups().unwrap().is_empty());
        assert_eq!(config.output_dir(), dir.join("acf-json"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_config() {
        let dir = std::env::temp_dir().join("acfkit_test_missing_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let err = Config::load(&dir).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
