//! Plugin discovery and retention.
//!
//! The registry is responsible for:
//! - Scanning the plugins directory in sorted directory-name order
//! - Creating each plugin from the catalog entry its `plugin.toml` names
//! - Calling `init` and keeping only plugins that initialize cleanly

use std::fs;
use std::path::{Path, PathBuf};

use super::catalog::PluginCatalog;
use super::dispatch::isolated;
use super::error::{PluginError, PluginResult};
use super::manifest::PluginManifest;
use super::{EntryPoints, Hook, Plugin, PluginContext, PluginId};
use crate::config::PluginsConfig;

/// A plugin that loaded and initialized successfully.
pub struct LoadedPlugin {
    pub id: PluginId,
    pub dir: PathBuf,
    pub entry_points: EntryPoints,
    pub(super) plugin: Box<dyn Plugin>,
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("id", &self.id)
            .field("dir", &self.dir)
            .field("entry_points", &self.entry_points)
            .finish()
    }
}

/// Ordered set of loaded plugins, kept for the life of the process.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    pub(super) plugins: Vec<LoadedPlugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` and load every plugin directory not loaded yet.
    ///
    /// The directory is created if missing. An unreadable root yields no
    /// plugins; a broken plugin is logged and skipped. Returns the plugins
    /// retained so far, in load order.
    pub fn discover(
        &mut self,
        root: &Path,
        catalog: &PluginCatalog,
        config: &PluginsConfig,
    ) -> &[LoadedPlugin] {
        if let Err(e) = fs::create_dir_all(root) {
            tracing::warn!(path = %root.display(), error = %e, "Failed to create plugins directory");
        }

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %root.display(), error = %e, "Plugins directory not readable");
                return &self.plugins;
            }
        };

        let mut candidates: Vec<(PluginId, PathBuf)> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let id = path.file_name()?.to_string_lossy().into_owned();
                Some((id, path))
            })
            .collect();
        candidates.sort();

        for (id, path) in candidates {
            if config.is_reserved(&id) {
                tracing::debug!(plugin = %id, "Skipping reserved plugin directory");
                continue;
            }

            match self.load(&id, &path, catalog) {
                Ok(loaded) => {
                    tracing::info!(plugin = %id, "Plugin loaded");
                    self.plugins.push(loaded);
                }
                Err(PluginError::EntryFileNotFound(_)) => {
                    tracing::info!(plugin = %id, "No plugin.toml found, skipping");
                }
                Err(PluginError::AlreadyLoaded(_)) => {
                    tracing::debug!(plugin = %id, "Plugin already loaded");
                }
                Err(e) => {
                    tracing::warn!(plugin = %id, error = %e, "Failed to load plugin");
                }
            }
        }

        &self.plugins
    }

    /// Load and initialize a single plugin directory.
    fn load(&self, id: &str, dir: &Path, catalog: &PluginCatalog) -> PluginResult<LoadedPlugin> {
        if self.contains(id) {
            return Err(PluginError::AlreadyLoaded(id.to_string()));
        }

        let manifest = PluginManifest::load(dir)?;
        let factory = catalog
            .get(&manifest.plugin.entry)
            .ok_or_else(|| PluginError::UnknownEntry {
                plugin: id.to_string(),
                entry: manifest.plugin.entry.clone(),
            })?;

        let ctx = PluginContext {
            id: id.to_string(),
            dir: dir.to_path_buf(),
            manifest,
        };

        let mut plugin = isolated(id, "load", || factory(&ctx))?;

        let entry_points = plugin.entry_points();
        if !entry_points.declares(Hook::Init) {
            return Err(PluginError::MissingInit(id.to_string()));
        }

        isolated(id, &Hook::Init.to_string(), || plugin.init())?;

        Ok(LoadedPlugin {
            id: ctx.id,
            dir: ctx.dir,
            entry_points,
            plugin,
        })
    }

    /// Number of loaded plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Whether a plugin with this identifier is loaded.
    pub fn contains(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p.id == id)
    }

    /// Identifiers of loaded plugins, in load order.
    pub fn ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }
}
