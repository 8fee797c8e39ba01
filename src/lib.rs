//! Plugin host and store update checker for a desktop game launcher.
//!
//! The launcher loads plugins from a per-user directory at startup and tells
//! them when its windows are built. The bundled update checker compares each
//! item's installed version with the version shown on its store page and
//! badges items that have a newer release.
//!
//! # Architecture
//!
//! - [`config`] - Host configuration loading and management
//! - [`host`] - Window interfaces the launcher implements for plugins
//! - [`plugins`] - Discovery, lifecycle hooks and failure isolation
//! - [`ui_queue`] - Marshalling background results onto the UI thread
//! - [`updates`] - The store update checker plugin
//!
//! # Example
//!
//! ```ignore
//! use launcher_plugins::{Config, PluginCatalog, PluginHost, UiQueue};
//!
//! let config = Config::load();
//! launcher_plugins::logging::init(&config.logging);
//!
//! let mut host = PluginHost::start(config, PluginCatalog::builtin());
//! host.host_window_built(&mut main_window);
//!
//! // In the UI loop:
//! queue.run_pending(&mut main_window);
//! ```

pub mod config;
pub mod host;
pub mod logging;
pub mod plugins;
pub mod ui_queue;
pub mod updates;

#[cfg(feature = "gtk-ui")]
pub mod gtk;

mod error;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{HostError, HostResult};
pub use host::{Badge, DialogResponse, HostWindow, Item, MenuEntry, SettingsWindow};
pub use plugins::{Plugin, PluginCatalog, PluginError, PluginHost, PluginResult};
pub use ui_queue::{UiHandle, UiQueue};
pub use updates::UpdateCheckPlugin;
