//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docimport_docserver::StoreLayout;
use docimport_openalex::{ImportConfig, ImportOptions};
use serde::Deserialize;

/// Global configuration for docimport
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub staging: StagingConfig,
    pub store: StoreConfig,
    pub import: ImportSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Glob of staged work files
    pub pattern: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            pattern: ImportConfig::default().staging_pattern,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(deserialize_with = "deserialize_env_path")]
    pub dir: PathBuf,
    pub primary: String,
    pub versions: String,
    /// Collection to write into; the primary collection when unset
    pub output: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let layout = StoreLayout::default();
        Self {
            dir: layout.dir,
            primary: layout.primary,
            versions: layout.versions,
            output: layout.output,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    pub dry_run: bool,
    pub limit: Option<usize>,
}

/// Path that may be given as an environment variable reference like ${VAR}
fn deserialize_env_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    expand_env_var(&raw)
        .map(PathBuf::from)
        .ok_or_else(|| serde::de::Error::custom(format!("environment variable in {raw} is not set")))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./docimport.toml (current directory)
    /// 2. ~/.config/docimport/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("docimport.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "docimport") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn store_layout(&self) -> StoreLayout {
        StoreLayout {
            dir: self.store.dir.clone(),
            primary: self.store.primary.clone(),
            versions: self.store.versions.clone(),
            output: self.store.output.clone(),
        }
    }

    /// Import configuration before command-line overrides
    pub fn import_config(&self) -> ImportConfig {
        ImportConfig {
            staging_pattern: self.staging.pattern.clone(),
            store: self.store_layout(),
            options: ImportOptions {
                dry_run: self.import.dry_run,
                limit: self.import.limit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.staging.pattern, "./staging/*.jsonl*");
        assert_eq!(config.store.dir, PathBuf::from("./store"));
        assert_eq!(config.store.primary, "documents.jsonl");
        assert_eq!(config.store.versions, "versions.jsonl");
        assert!(config.store.output.is_none());
        assert!(!config.import.dry_run);
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("DOCIMPORT_TEST_VAR", "test_value");
        assert_eq!(
            expand_env_var("${DOCIMPORT_TEST_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("DOCIMPORT_TEST_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[staging]
pattern = "/data/openalex/*.jsonl.gz"

[store]
dir = "/srv/docserver"
output = "imported.jsonl"

[import]
limit = 100
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.staging.pattern, "/data/openalex/*.jsonl.gz");
        assert_eq!(config.store.dir, PathBuf::from("/srv/docserver"));
        assert_eq!(config.store.primary, "documents.jsonl");
        assert_eq!(config.store.output.as_deref(), Some("imported.jsonl"));
        assert_eq!(config.import.limit, Some(100));

        let import = config.import_config();
        assert_eq!(import.store.primary_path(), PathBuf::from("/srv/docserver/documents.jsonl"));
        assert_eq!(import.options.limit, Some(100));
    }

    #[test]
    fn unset_store_variable_is_error() {
        let toml = "[store]\ndir = \"${NONEXISTENT_VAR_67890}\"\n";
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docimport.toml");
        std::fs::write(&path, "[import]\ndry_run = true\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert!(config.import.dry_run);
        assert!(Config::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
