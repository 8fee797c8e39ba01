//! Plugin host - owns every loaded plugin for the life of the launcher.
//!
//! The launcher creates one `PluginHost` during startup, before any window
//! exists, and forwards window lifecycle events to it.

use std::path::PathBuf;

use super::catalog::PluginCatalog;
use super::dispatch::HookEvent;
use super::registry::PluginRegistry;
use crate::config::Config;
use crate::host::{HostWindow, SettingsWindow};

pub struct PluginHost {
    config: Config,
    catalog: PluginCatalog,
    registry: PluginRegistry,
}

impl PluginHost {
    /// Discover and initialize plugins from the configured directory.
    pub fn start(config: Config, catalog: PluginCatalog) -> Self {
        let mut host = Self {
            config,
            catalog,
            registry: PluginRegistry::new(),
        };
        host.scan();
        host
    }

    /// Load plugin directories added since the last scan.
    pub fn scan(&mut self) {
        let root = self.plugins_dir();
        let loaded = self
            .registry
            .discover(&root, &self.catalog, &self.config.plugins)
            .len();
        tracing::info!(path = %root.display(), loaded, "Plugin scan complete");
    }

    /// Notify plugins that the main window is ready.
    pub fn host_window_built(&mut self, window: &mut dyn HostWindow) {
        self.registry.dispatch(HookEvent::HostWindowBuilt(window));
    }

    /// Notify plugins that the settings window is ready.
    pub fn settings_window_built(&mut self, window: &mut dyn SettingsWindow) {
        self.registry.dispatch(HookEvent::SettingsWindowBuilt(window));
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.config.plugins.plugins_dir()
    }

    /// Identifiers of loaded plugins, in load order.
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.registry.ids()
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }
}
