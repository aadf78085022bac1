use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::cache::DEFAULT_TTL_SECS;
use crate::location::Location;

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default location key, e.g. "melbourne".
    pub default_location: Option<String>,

    /// Optional override of the snapshot freshness window, in seconds.
    pub cache_ttl_secs: Option<u64>,
}

impl Config {
    /// Snapshot freshness window, falling back to the built-in default.
    pub fn ttl_secs(&self) -> u64 {
        self.cache_ttl_secs.unwrap_or(DEFAULT_TTL_SECS)
    }

    /// Store the default location key in its canonical lowercase form.
    pub fn set_default_location(&mut self, key: &str) {
        self.default_location = Some(key.to_lowercase());
    }

    /// The configured default location, resolved against the known set.
    /// Returns None when nothing is configured; an unknown configured key
    /// still resolves (to the fallback location) rather than erroring.
    pub fn resolve_default_location(&self) -> Option<&'static Location> {
        self.default_location
            .as_deref()
            .map(Location::resolve)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_default_location() {
        let cfg = Config::default();
        assert!(cfg.resolve_default_location().is_none());
    }

    #[test]
    fn default_location_is_canonicalized() {
        let mut cfg = Config::default();
        cfg.set_default_location("Sydney");
        assert_eq!(cfg.default_location.as_deref(), Some("sydney"));
        assert_eq!(cfg.resolve_default_location().map(|l| l.key), Some("sydney"));
    }

    #[test]
    fn unknown_configured_key_resolves_to_fallback() {
        let mut cfg = Config::default();
        cfg.set_default_location("atlantis");
        assert_eq!(cfg.resolve_default_location().map(|l| l.key), Some("melbourne"));
    }

    #[test]
    fn ttl_defaults_and_overrides() {
        let cfg = Config::default();
        assert_eq!(cfg.ttl_secs(), DEFAULT_TTL_SECS);

        let cfg = Config {
            cache_ttl_secs: Some(60),
            ..Config::default()
        };
        assert_eq!(cfg.ttl_secs(), 60);
    }
}
