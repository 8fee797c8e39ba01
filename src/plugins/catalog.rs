//! Table of plugin factories known to the host.
//!
//! A plugin directory's entry file names one of these factories; discovery
//! never executes anything that was not registered here.

use std::collections::HashMap;

use super::error::PluginResult;
use super::{Plugin, PluginContext};
use crate::updates::UpdateCheckPlugin;

/// Creates a plugin instance for one plugin directory.
pub type PluginFactory = Box<dyn Fn(&PluginContext) -> PluginResult<Box<dyn Plugin>>>;

/// Factories by entry name.
#[derive(Default)]
pub struct PluginCatalog {
    factories: HashMap<String, PluginFactory>,
}

impl PluginCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of plugins that ship with the launcher.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(UpdateCheckPlugin::ENTRY, |ctx: &PluginContext| {
            Ok(Box::new(UpdateCheckPlugin::new(ctx)?) as Box<dyn Plugin>)
        });
        catalog
    }

    /// Register a factory, replacing any previous one with the same name.
    pub fn register<F>(&mut self, entry: &str, factory: F)
    where
        F: Fn(&PluginContext) -> PluginResult<Box<dyn Plugin>> + 'static,
    {
        self.factories.insert(entry.to_string(), Box::new(factory));
    }

    pub fn get(&self, entry: &str) -> Option<&PluginFactory> {
        self.factories.get(entry)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.factories.contains_key(entry)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<&String> = self.factories.keys().collect();
        entries.sort();
        f.debug_struct("PluginCatalog")
            .field("entries", &entries)
            .finish()
    }
}
