//! Plugin system for the launcher.
//!
//! This module discovers plugin directories, creates each plugin from the
//! host's [`PluginCatalog`], and broadcasts lifecycle events to them.
//!
//! # Architecture
//!
//! ```text
//! PluginHost
//! ├── config: Config
//! ├── catalog: PluginCatalog (entry name -> factory)
//! └── registry: PluginRegistry
//!     └── plugins: Vec<LoadedPlugin> (sorted by directory name)
//! ```
//!
//! A plugin directory contains a `plugin.toml` entry file naming a catalog
//! entry. Plugins are loaded once, initialized immediately, and kept for the
//! life of the process. A plugin that fails to load, lacks `init`, or fails
//! in `init` is skipped. Errors and panics raised by lifecycle handlers are
//! logged and never reach the launcher or other plugins.

mod catalog;
mod dispatch;
mod error;
mod host;
mod manifest;
mod registry;

use std::fmt;
use std::path::PathBuf;

use crate::host::{HostWindow, SettingsWindow};

pub use catalog::{PluginCatalog, PluginFactory};
pub use dispatch::HookEvent;
pub use error::{PluginError, PluginResult};
pub use host::PluginHost;
pub use manifest::{PluginManifest, PluginMeta, ENTRY_FILE};
pub use registry::{LoadedPlugin, PluginRegistry};

/// Unique identifier for a plugin (its directory name).
pub type PluginId = String;

/// Lifecycle entry points a plugin can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Init,
    HostWindowBuilt,
    SettingsWindowBuilt,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hook::Init => "init",
            Hook::HostWindowBuilt => "host-window-built",
            Hook::SettingsWindowBuilt => "settings-window-built",
        })
    }
}

/// The set of entry points a plugin declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryPoints {
    pub init: bool,
    pub host_window_built: bool,
    pub settings_window_built: bool,
}

impl EntryPoints {
    pub const ALL: Self = Self {
        init: true,
        host_window_built: true,
        settings_window_built: true,
    };

    pub const INIT_ONLY: Self = Self {
        init: true,
        host_window_built: false,
        settings_window_built: false,
    };

    pub fn declares(&self, hook: Hook) -> bool {
        match hook {
            Hook::Init => self.init,
            Hook::HostWindowBuilt => self.host_window_built,
            Hook::SettingsWindowBuilt => self.settings_window_built,
        }
    }
}

/// Everything a plugin learns about itself when it is created.
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Plugin identifier, taken from the directory name.
    pub id: PluginId,
    /// The plugin's own directory; plugins keep their data files here.
    pub dir: PathBuf,
    /// Parsed entry file.
    pub manifest: PluginManifest,
}

impl PluginContext {
    /// Display title, falling back to the identifier.
    pub fn title(&self) -> &str {
        self.manifest.plugin.title.as_deref().unwrap_or(&self.id)
    }
}

/// A loaded plugin.
///
/// Only `init` is mandatory. Handlers for entry points a plugin does not
/// declare in [`Plugin::entry_points`] are never called.
pub trait Plugin {
    /// Entry points this plugin exposes.
    fn entry_points(&self) -> EntryPoints;

    /// Called once, right after the plugin is loaded.
    fn init(&mut self) -> PluginResult<()>;

    /// Called when the launcher's main window has been built.
    fn on_host_window_built(&mut self, _window: &mut dyn HostWindow) -> PluginResult<()> {
        Ok(())
    }

    /// Called when the launcher's settings window has been built.
    fn on_settings_window_built(&mut self, _window: &mut dyn SettingsWindow) -> PluginResult<()> {
        Ok(())
    }
}

/// Render a panic payload for logging.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
