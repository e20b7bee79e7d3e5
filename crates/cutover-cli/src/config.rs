//! # Configuration
//!
//! An optional YAML file supplies defaults for the global flags:
//!
//! ```yaml
//! roster: rosters/spring.yaml
//! workflow: workflow-v2.yaml
//! customer: Contoso Logistics
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file. Command-line flags win over config values; with neither, the
//! built-in roster and the standard workflow are used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Display name used for customer notifications when none is configured.
pub const DEFAULT_CUSTOMER: &str = "Customer";

/// Contents of a config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub roster: Option<PathBuf>,
    pub workflow: Option<PathBuf>,
    pub customer: Option<String>,
}

impl ConfigFile {
    /// Read and parse `path`, resolving relative paths against its parent.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.roster = config.roster.map(|p| base.join(p));
        config.workflow = config.workflow.map(|p| base.join(p));
        Ok(config)
    }
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub roster: Option<PathBuf>,
    pub workflow: Option<PathBuf>,
    pub customer: String,
}

impl Settings {
    pub fn merge(
        config: ConfigFile,
        roster: Option<PathBuf>,
        workflow: Option<PathBuf>,
        customer: Option<String>,
    ) -> Self {
        Self {
            roster: roster.or(config.roster),
            workflow: workflow.or(config.workflow),
            customer: customer
                .or(config.customer)
                .unwrap_or_else(|| DEFAULT_CUSTOMER.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_resolves_paths_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutover.yaml");
        std::fs::write(&path, "roster: rosters/a.yaml\ncustomer: Contoso\n").unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.roster, Some(dir.path().join("rosters/a.yaml")));
        assert_eq!(config.workflow, None);
        assert_eq!(config.customer.as_deref(), Some("Contoso"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutover.yaml");
        std::fs::write(&path, "rooster: a.yaml\n").unwrap();
        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }

    #[test]
    fn flags_override_config() {
        let config = ConfigFile {
            roster: Some(PathBuf::from("from-config.yaml")),
            workflow: Some(PathBuf::from("wf.yaml")),
            customer: Some("Config Co".into()),
        };
        let settings = Settings::merge(
            config,
            Some(PathBuf::from("from-flag.yaml")),
            None,
            None,
        );
        assert_eq!(settings.roster, Some(PathBuf::from("from-flag.yaml")));
        assert_eq!(settings.workflow, Some(PathBuf::from("wf.yaml")));
        assert_eq!(settings.customer, "Config Co");
    }

    #[test]
    fn defaults_without_config() {
        let settings = Settings::merge(ConfigFile::default(), None, None, None);
        assert_eq!(settings.roster, None);
        assert_eq!(settings.customer, DEFAULT_CUSTOMER);
    }
}
