//! Plugin entry file parsing.
//!
//! Each plugin directory has a `plugin.toml` entry file that defines:
//! - Which catalog entry creates the plugin
//! - Display metadata (title, description)
//! - Plugin-specific options

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::error::{PluginError, PluginResult};

/// Name of the entry file every plugin directory must contain.
pub const ENTRY_FILE: &str = "plugin.toml";

/// Complete entry file parsed from `plugin.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub plugin: PluginMeta,

    /// Free-form table handed to the plugin.
    #[serde(default)]
    pub options: toml::Table,
}

/// Plugin metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMeta {
    /// Catalog entry that creates the plugin.
    pub entry: String,

    /// Human-readable display name.
    #[serde(default)]
    pub title: Option<String>,

    /// Short description.
    #[serde(default)]
    pub description: String,
}

impl PluginManifest {
    /// Load the entry file from a plugin directory.
    pub fn load(plugin_dir: &Path) -> PluginResult<Self> {
        let manifest_path = plugin_dir.join(ENTRY_FILE);

        if !manifest_path.is_file() {
            return Err(PluginError::EntryFileNotFound(plugin_dir.to_path_buf()));
        }

        let content = std::fs::read_to_string(&manifest_path)?;

        let manifest: Self = toml::from_str(&content).map_err(|e| PluginError::ManifestInvalid {
            path: manifest_path.clone(),
            message: e.to_string(),
        })?;

        manifest.validate(&manifest_path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> PluginResult<()> {
        if self.plugin.entry.trim().is_empty() {
            return Err(PluginError::ManifestInvalid {
                path: path.to_path_buf(),
                message: "plugin.entry is required".to_string(),
            });
        }
        Ok(())
    }

    /// Deserialize the `[options]` table into a plugin's option type.
    pub fn options<T: DeserializeOwned>(&self) -> PluginResult<T> {
        Ok(toml::Value::Table(self.options.clone()).try_into()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Options {
        #[serde(default)]
        speed: u32,
    }

    #[test]
    fn test_load_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(ENTRY_FILE),
            r#"
[plugin]
entry = "update-checker"
title = "Store updates"

[options]
speed = 3
"#,
        )
        .unwrap();

        let manifest = PluginManifest::load(temp.path()).unwrap();
        assert_eq!(manifest.plugin.entry, "update-checker");
        assert_eq!(manifest.plugin.title.as_deref(), Some("Store updates"));
        assert_eq!(manifest.options::<Options>().unwrap(), Options { speed: 3 });
    }

    #[test]
    fn test_missing_entry_file() {
        let temp = TempDir::new().unwrap();
        let err = PluginManifest::load(temp.path()).unwrap_err();
        assert!(matches!(err, PluginError::EntryFileNotFound(_)));
    }

    #[test]
    fn test_empty_entry_is_invalid() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(ENTRY_FILE), "[plugin]\nentry = \" \"\n").unwrap();

        let err = PluginManifest::load(temp.path()).unwrap_err();
        assert!(matches!(err, PluginError::ManifestInvalid { .. }));
    }

    #[test]
    fn test_missing_options_table_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(ENTRY_FILE), "[plugin]\nentry = \"x\"\n").unwrap();

        let manifest = PluginManifest::load(temp.path()).unwrap();
        assert_eq!(manifest.options::<Options>().unwrap(), Options { speed: 0 });
    }
}
