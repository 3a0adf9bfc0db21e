//! Configuration Management
//!
//! Handles persistent configuration storage for tfgraph.

use crate::provider::{DecodeMode, ProviderType};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider used when none is given on the command line
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Fail on malformed reference values instead of skipping them
    #[serde(default)]
    pub strict: bool,
    /// Prune resource configuration to the used attributes before extraction
    #[serde(default)]
    pub prune: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tfgraph").join("config.json"))
    }

    /// Log file next to the config, or in the home/working directory when
    /// no config directory exists
    pub fn log_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            return config_dir.join("tfgraph").join("tfgraph.log");
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".tfgraph").join("tfgraph.log");
        }
        PathBuf::from("tfgraph.log")
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Apply `config set` changes; the provider name must parse
    pub fn update(
        &mut self,
        provider: Option<&str>,
        strict: Option<bool>,
        prune: Option<bool>,
    ) -> Result<()> {
        if let Some(name) = provider {
            let provider = name
                .parse::<ProviderType>()
                .with_context(|| format!("Invalid provider {:?}", name))?;
            self.default_provider = Some(provider.as_str().to_string());
        }
        if let Some(strict) = strict {
            self.strict = strict;
        }
        if let Some(prune) = prune {
            self.prune = prune;
        }
        Ok(())
    }

    /// Get effective provider (CLI > config > openstack)
    pub fn effective_provider(&self, cli: Option<&str>) -> Result<ProviderType> {
        let name = cli
            .or(self.default_provider.as_deref())
            .unwrap_or(ProviderType::OpenStack.as_str());

        name.parse::<ProviderType>()
            .with_context(|| format!("Invalid provider {:?}", name))
    }

    /// Get effective decode mode (CLI --strict > config)
    pub fn effective_mode(&self, cli_strict: bool) -> DecodeMode {
        if cli_strict || self.strict {
            DecodeMode::Strict
        } else {
            DecodeMode::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            default_provider: Some("openstack".to_string()),
            strict: true,
            prune: false,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_effective_provider_precedence() {
        let config = Config {
            default_provider: Some("nop".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.effective_provider(Some("openstack")).unwrap(),
            ProviderType::OpenStack
        );
        assert_eq!(config.effective_provider(None).unwrap(), ProviderType::Nop);
        assert_eq!(
            Config::default().effective_provider(None).unwrap(),
            ProviderType::OpenStack
        );
        assert!(config.effective_provider(Some("aws")).is_err());
    }

    #[test]
    fn test_update_then_save_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();

        config.update(Some("OpenStack"), Some(true), None).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.default_provider.as_deref(), Some("openstack"));
        assert!(loaded.strict);
        assert!(!loaded.prune);
    }

    #[test]
    fn test_update_rejects_unknown_provider() {
        let mut config = Config::default();
        assert!(config.update(Some("aws"), Some(true), None).is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_log_path_is_tfgraph_log() {
        let path = Config::log_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("tfgraph.log"));
    }

    #[test]
    fn test_effective_mode() {
        assert_eq!(Config::default().effective_mode(false), DecodeMode::Lenient);
        assert_eq!(Config::default().effective_mode(true), DecodeMode::Strict);
        let strict = Config {
            strict: true,
            ..Default::default()
        };
        assert_eq!(strict.effective_mode(false), DecodeMode::Strict);
    }
}
