//! Lifecycle event broadcast with per-plugin failure isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::error::{PluginError, PluginResult};
use super::registry::PluginRegistry;
use super::{panic_message, Hook};
use crate::host::{HostWindow, SettingsWindow};

/// A lifecycle event and the window it concerns.
pub enum HookEvent<'a> {
    HostWindowBuilt(&'a mut dyn HostWindow),
    SettingsWindowBuilt(&'a mut dyn SettingsWindow),
}

impl HookEvent<'_> {
    pub fn hook(&self) -> Hook {
        match self {
            HookEvent::HostWindowBuilt(_) => Hook::HostWindowBuilt,
            HookEvent::SettingsWindowBuilt(_) => Hook::SettingsWindowBuilt,
        }
    }
}

/// Run plugin code, turning a panic into [`PluginError::Panicked`].
pub(super) fn isolated<T>(
    plugin: &str,
    stage: &str,
    f: impl FnOnce() -> PluginResult<T>,
) -> PluginResult<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(PluginError::Panicked {
            plugin: plugin.to_string(),
            hook: stage.to_string(),
            message: panic_message(&*payload),
        }),
    }
}

impl PluginRegistry {
    /// Deliver `event` to every plugin that declares its entry point.
    ///
    /// Plugins are called in load order. A handler that returns an error or
    /// panics is logged; the remaining plugins still receive the event.
    pub fn dispatch(&mut self, mut event: HookEvent<'_>) {
        let hook = event.hook();

        for loaded in self.plugins.iter_mut() {
            if !loaded.entry_points.declares(hook) {
                continue;
            }

            let plugin = &mut loaded.plugin;
            let result = isolated(&loaded.id, &hook.to_string(), || match &mut event {
                HookEvent::HostWindowBuilt(window) => plugin.on_host_window_built(&mut **window),
                HookEvent::SettingsWindowBuilt(window) => {
                    plugin.on_settings_window_built(&mut **window)
                }
            });

            if let Err(e) = result {
                tracing::warn!(plugin = %loaded.id, hook = %hook, error = %e, "Plugin hook failed");
            }
        }
    }
}
