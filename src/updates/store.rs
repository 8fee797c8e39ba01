//! Per-item update settings, persisted as one JSON document.
//!
//! The document maps item titles to `{"url": ..., "installed_version": ...}`.
//! Older files stored a bare URL string per title; those still load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::plugins::{PluginError, PluginResult};

/// Update settings for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Item page on the store; empty means "derive from the item id".
    pub url: String,
    /// Version the user has installed; empty means "not tracked".
    pub installed_version: String,
}

impl ItemConfig {
    pub fn new(url: &str, installed_version: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            installed_version: installed_version.trim().to_string(),
        }
    }

    /// An entry with nothing set is not worth storing.
    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.installed_version.is_empty()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(url) => Some(Self::new(url, "")),
            Value::Object(fields) => {
                let field = |name: &str| fields.get(name).and_then(Value::as_str).unwrap_or("");
                Some(Self::new(field("url"), field("installed_version")))
            }
            _ => None,
        }
    }
}

/// All stored settings, keyed by item title.
pub type ItemConfigs = BTreeMap<String, ItemConfig>;

/// JSON-file backed settings store.
///
/// Every operation reads or writes the whole document. Writes replace the
/// file atomically, so background readers never see a partial document.
#[derive(Debug, Clone)]
pub struct ItemConfigStore {
    path: PathBuf,
}

impl ItemConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. A missing or unreadable document is empty.
    pub fn load(&self) -> ItemConfigs {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return ItemConfigs::new(),
        };

        let document: BTreeMap<String, Value> = match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable update settings");
                return ItemConfigs::new();
            }
        };

        document
            .iter()
            .filter_map(|(title, value)| Some((title.clone(), ItemConfig::from_value(value)?)))
            .collect()
    }

    /// Replace the document with `configs`, dropping empty entries.
    pub fn save(&self, configs: &ItemConfigs) -> PluginResult<()> {
        let kept: BTreeMap<&String, &ItemConfig> =
            configs.iter().filter(|(_, config)| !config.is_empty()).collect();
        let contents = serde_json::to_string_pretty(&kept)?;

        let write_err = |source| PluginError::StoreWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }

    /// Settings for `title`, or empty settings if none are stored.
    pub fn get(&self, title: &str) -> ItemConfig {
        self.load().remove(title).unwrap_or_default()
    }

    /// Store settings for `title`; clearing both fields removes the entry.
    ///
    /// An empty title is ignored.
    pub fn set(&self, title: &str, url: &str, installed_version: &str) -> PluginResult<()> {
        if title.is_empty() {
            return Ok(());
        }

        let mut configs = self.load();
        let config = ItemConfig::new(url, installed_version);
        if config.is_empty() {
            configs.remove(title);
        } else {
            configs.insert(title.to_string(), config);
        }
        self.save(&configs)
    }
}
