use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HostError, HostResult};

/// Directory name used under the per-user config and data directories.
pub const APP_DIR_NAME: &str = "launcher";

/// Plugin directory skipped during discovery; ships as a template for authors.
pub const EXAMPLE_PLUGIN_DIR: &str = "example_plugin";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plugins: PluginsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Discovery root. `~` is expanded; empty means the per-user data directory.
    pub directory: String,
    /// Directory names never loaded as plugins.
    pub reserved: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            directory: String::new(),
            reserved: vec![EXAMPLE_PLUGIN_DIR.to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "launcher_plugins=info".to_string(),
        }
    }
}

impl PluginsConfig {
    /// Resolve the plugin discovery root.
    pub fn plugins_dir(&self) -> PathBuf {
        let directory = self.directory.trim();
        if directory.is_empty() {
            return default_plugins_dir();
        }
        PathBuf::from(shellexpand::tilde(directory).into_owned())
    }

    /// Whether a directory name is reserved and must not be loaded.
    pub fn is_reserved(&self, dir_name: &str) -> bool {
        self.reserved.iter().any(|r| r == dir_name)
    }
}

fn default_plugins_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME).join("plugins"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".local/share").join(APP_DIR_NAME).join("plugins"))
                .unwrap_or_else(|| PathBuf::from("/tmp").join(APP_DIR_NAME).join("plugins"))
        })
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join(APP_DIR_NAME)
            .join("plugins.toml")
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`. Read and parse failures fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config");
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read config");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.validate();
        config
    }

    /// Normalize values that would otherwise break discovery or logging
    fn validate(&mut self) {
        self.plugins.reserved.retain(|name| !name.trim().is_empty());

        if self.logging.filter.trim().is_empty() {
            self.logging.filter = LoggingConfig::default().filter;
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> HostResult<()> {
        self.save_to(&Self::config_path())
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> HostResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                HostError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("plugins.toml"));

        assert!(config.plugins.directory.is_empty());
        assert!(config.plugins.is_reserved(EXAMPLE_PLUGIN_DIR));
        assert_eq!(config.logging.filter, "launcher_plugins=info");
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugins.toml");
        fs::write(&path, "[plugins\ndirectory = ").unwrap();

        let config = Config::load_from(&path);
        assert!(config.plugins.is_reserved(EXAMPLE_PLUGIN_DIR));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugins.toml");
        fs::write(&path, "[logging]\nfilter = \"debug\"\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.logging.filter, "debug");
        assert!(config.plugins.is_reserved(EXAMPLE_PLUGIN_DIR));
    }

    #[test]
    fn test_blank_values_are_normalized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plugins.toml");
        fs::write(
            &path,
            "[plugins]\nreserved = [\"\", \"demo\"]\n[logging]\nfilter = \"  \"\n",
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.plugins.reserved, vec!["demo".to_string()]);
        assert_eq!(config.logging.filter, "launcher_plugins=info");
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("plugins.toml");

        let mut config = Config::default();
        config.plugins.directory = temp.path().join("plugins").display().to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.plugins.plugins_dir(), temp.path().join("plugins"));
    }

    #[test]
    fn test_tilde_is_expanded() {
        let plugins = PluginsConfig {
            directory: "~/plugins".to_string(),
            ..Default::default()
        };

        let resolved = plugins.plugins_dir();
        assert!(!resolved.to_string_lossy().starts_with('~'));
        assert!(resolved.ends_with("plugins"));
    }
}
