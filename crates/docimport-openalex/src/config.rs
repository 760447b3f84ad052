//! Import run configuration

use docimport_docserver::StoreLayout;

/// Knobs of the record loop itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Map and check existence but never save
    pub dry_run: bool,
    /// Stop after this many staged records
    pub limit: Option<usize>,
}

/// Runtime configuration for an import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Glob matching staged `.jsonl` / `.jsonl.gz` files
    pub staging_pattern: String,
    pub store: StoreLayout,
    pub options: ImportOptions,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            staging_pattern: "./staging/*.jsonl*".to_string(),
            store: StoreLayout::default(),
            options: ImportOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_config() {
        let config = ImportConfig::default();
        assert_eq!(config.staging_pattern, "./staging/*.jsonl*");
        assert_eq!(config.store.dir, PathBuf::from("./store"));
        assert!(config.store.output.is_none());
        assert!(!config.options.dry_run);
        assert!(config.options.limit.is_none());
    }
}
