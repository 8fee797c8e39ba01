//! Store update checker plugin.
//!
//! Tracks the installed version of library items against the version badge
//! on their store pages and marks items that have a newer release.
//!
//! # Plugin options
//!
//! ```toml
//! [plugin]
//! entry = "update-checker"
//! title = "Store updates"
//!
//! [options]
//! store_url = "https://ankergames.net/"
//! item_url_template = "https://ankergames.net/game/{id}"
//! settings_file = "settings.json"   # relative to the plugin directory
//! timeout_secs = 10
//! throttle_ms = 200
//! ```

mod check;
mod extract;
mod fetch;
mod menu;
mod settings;
mod store;
mod version;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::host::{HostWindow, MenuEntry, SettingsWindow};
use crate::plugins::{EntryPoints, Plugin, PluginContext, PluginError, PluginResult};

pub use check::{
    apply_result, CheckResult, StoreUrls, UpdateChecker, DEFAULT_ITEM_URL_TEMPLATE,
    DEFAULT_STORE_URL, DEFAULT_THROTTLE,
};
pub use extract::extract_version;
pub use fetch::{HttpFetcher, VersionSource, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use menu::{item_submenu, CHECK_UPDATES_LABEL, ITEM_PAGE_LABEL, SETTINGS_LABEL};
pub use settings::ItemSettingsForm;
pub use store::{ItemConfig, ItemConfigStore, ItemConfigs};
pub use version::{compare, tokenize, VersionToken};

/// `[options]` accepted by the update checker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateCheckOptions {
    pub store_url: String,
    pub item_url_template: String,
    pub settings_file: String,
    pub timeout_secs: u64,
    pub throttle_ms: u64,
    pub user_agent: String,
}

impl Default for UpdateCheckOptions {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            item_url_template: DEFAULT_ITEM_URL_TEMPLATE.to_string(),
            settings_file: "settings.json".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UpdateCheckOptions {
    pub fn validate(&self) -> PluginResult<()> {
        fn invalid(option: &str, message: &str) -> PluginError {
            PluginError::InvalidOption {
                option: option.to_string(),
                message: message.to_string(),
            }
        }

        for (option, url) in [
            ("store_url", &self.store_url),
            ("item_url_template", &self.item_url_template),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(invalid(option, "must be an http(s) URL"));
            }
        }
        if !self.item_url_template.contains("{id}") {
            return Err(invalid("item_url_template", "must contain {id}"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be positive"));
        }
        if self.settings_file.trim().is_empty() {
            return Err(invalid("settings_file", "must not be empty"));
        }
        Ok(())
    }

    pub fn urls(&self) -> StoreUrls {
        StoreUrls {
            home: self.store_url.clone(),
            item_template: self.item_url_template.clone(),
        }
    }
}

/// The update checker, as loaded by the plugin host.
pub struct UpdateCheckPlugin {
    title: String,
    dir: PathBuf,
    options: UpdateCheckOptions,
    source: Option<Arc<dyn VersionSource>>,
    checker: Option<UpdateChecker>,
}

impl UpdateCheckPlugin {
    /// Catalog entry name.
    pub const ENTRY: &'static str = "update-checker";

    pub fn new(ctx: &PluginContext) -> PluginResult<Self> {
        Ok(Self {
            title: ctx.title().to_string(),
            dir: ctx.dir.clone(),
            options: ctx.manifest.options()?,
            source: None,
            checker: None,
        })
    }

    /// Use `source` instead of fetching store pages over HTTP.
    pub fn with_source(mut self, source: Arc<dyn VersionSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn options(&self) -> &UpdateCheckOptions {
        &self.options
    }

    /// Where per-item settings are stored.
    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(self.options.settings_file.trim())
    }

    fn checker(&self) -> PluginResult<&UpdateChecker> {
        self.checker
            .as_ref()
            .ok_or_else(|| PluginError::Failed(format!("{} is not initialized", self.title)))
    }
}

impl Plugin for UpdateCheckPlugin {
    fn entry_points(&self) -> EntryPoints {
        EntryPoints::ALL
    }

    fn init(&mut self) -> PluginResult<()> {
        self.options.validate()?;

        let source = match self.source.take() {
            Some(source) => source,
            None => Arc::new(HttpFetcher::new(
                &self.options.user_agent,
                Duration::from_secs(self.options.timeout_secs),
            )?),
        };

        self.checker = Some(UpdateChecker::new(
            ItemConfigStore::new(self.settings_path()),
            self.options.urls(),
            source,
            Duration::from_millis(self.options.throttle_ms),
        ));

        tracing::debug!(settings = %self.settings_path().display(), "Update checker ready");
        Ok(())
    }

    fn on_host_window_built(&mut self, window: &mut dyn HostWindow) -> PluginResult<()> {
        let checker = self.checker()?.clone();

        window.add_menu_entry(MenuEntry::Separator);
        window.add_menu_entry(item_submenu(&self.title, checker.clone()));

        checker.spawn_scan(window.items(), window.ui_handle())?;
        Ok(())
    }

    fn on_settings_window_built(&mut self, _window: &mut dyn SettingsWindow) -> PluginResult<()> {
        tracing::debug!(plugin = %self.title, "No global settings to add");
        Ok(())
    }
}
