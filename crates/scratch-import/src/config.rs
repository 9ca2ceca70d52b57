// Import configuration
//
// Stored as JSON next to the host's other settings. Every field except the
// storage root has a default, so a partial file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::copy::DEFAULT_CHUNK_SIZE;

/// When to ask the host about an existing destination.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Ask once for every conflicting item.
    #[default]
    PerItem,
    /// Ask on the first conflict of a batch and reuse the answer for the
    /// rest of that batch.
    ApplyToAll,
}

/// What to do with a destination file when copying into it fails midway.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CopyFailurePolicy {
    #[default]
    RemovePartial,
    KeepPartial,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportConfig {
    /// App-private directory all projects are copied into.
    pub storage_root: PathBuf,
    pub chunk_size: usize,
    pub conflict_strategy: ConflictStrategy,
    pub on_copy_failure: CopyFailurePolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            conflict_strategy: ConflictStrategy::default(),
            on_copy_failure: CopyFailurePolicy::default(),
        }
    }
}

impl ImportConfig {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_conflict_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.conflict_strategy = strategy;
        self
    }

    pub fn with_copy_failure_policy(mut self, policy: CopyFailurePolicy) -> Self {
        self.on_copy_failure = policy;
        self
    }

    /// Load config from a JSON file. A missing file yields the defaults for
    /// `storage_root`; a `storage_root` in the file takes precedence.
    pub fn load(path: &Path, storage_root: impl Into<PathBuf>) -> Result<Self> {
        let mut config = if path.exists() {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<ImportConfig>(&data)
                .with_context(|| format!("invalid import config {}", path.display()))?
        } else {
            ImportConfig::default()
        };
        if config.storage_root.as_os_str().is_empty() {
            config.storage_root = storage_root.into();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_root.as_os_str().is_empty() {
            anyhow::bail!("storage root is not set");
        }
        if self.chunk_size == 0 {
            anyhow::bail!("chunk size must be at least 1 byte");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ImportConfig::new("/data/scratch");
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.conflict_strategy, ConflictStrategy::PerItem);
        assert_eq!(config.on_copy_failure, CopyFailurePolicy::RemovePartial);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_uses_given_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImportConfig::load(&dir.path().join("import.json"), "/data/root").unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/data/root"));
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        std::fs::write(&path, r#"{"conflict_strategy":"apply_to_all"}"#).unwrap();

        let config = ImportConfig::load(&path, "/data/root").unwrap();
        assert_eq!(config.conflict_strategy, ConflictStrategy::ApplyToAll);
        assert_eq!(config.on_copy_failure, CopyFailurePolicy::RemovePartial);
        assert_eq!(config.storage_root, PathBuf::from("/data/root"));
    }

    #[test]
    fn file_root_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        std::fs::write(&path, r#"{"storage_root":"/sdcard/scratch"}"#).unwrap();

        let config = ImportConfig::load(&path, "/data/root").unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/sdcard/scratch"));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        std::fs::write(&path, r#"{"chunk_size":0}"#).unwrap();
        assert!(ImportConfig::load(&path, "/data/root").is_err());
    }

    #[test]
    fn invalid_json_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ImportConfig::load(&path, "/data/root").is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        let config = ImportConfig::new(dir.path().join("projects"))
            .with_chunk_size(512)
            .with_copy_failure_policy(CopyFailurePolicy::KeepPartial);
        config.save(&path).unwrap();

        let loaded = ImportConfig::load(&path, "/ignored").unwrap();
        assert_eq!(loaded, config);
    }
}
