//! Per-item settings form edited through the host's settings dialog.

use super::check::UpdateChecker;
use super::store::ItemConfigStore;
use crate::host::Item;
use crate::plugins::{PluginError, PluginResult};

/// Editable update settings for one item.
///
/// The host renders `title` read-only and binds `url` and
/// `installed_version` to text fields. It should disable its accept button
/// while [`is_url_valid`](Self::is_url_valid) is false and wire a reset
/// button to [`reset_url`](Self::reset_url).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSettingsForm {
    pub title: String,
    pub url: String,
    pub installed_version: String,
    default_url: String,
}

impl ItemSettingsForm {
    /// Prefill the form from stored settings.
    ///
    /// Without a saved URL the field proposes the item's store page.
    pub fn open(checker: &UpdateChecker, item: &Item) -> Self {
        let saved = checker.store().get(&item.title);
        let default_url = checker.urls().item_url(item.id.as_deref());
        let url = if saved.url.is_empty() {
            default_url.clone()
        } else {
            saved.url
        };

        Self {
            title: item.title.clone(),
            url,
            installed_version: saved.installed_version,
            default_url,
        }
    }

    /// URL proposed for this item; empty if the item has no id.
    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    /// Empty, or an http(s) URL.
    pub fn is_url_valid(&self) -> bool {
        let url = self.url.trim();
        url.is_empty() || url.starts_with("http://") || url.starts_with("https://")
    }

    pub fn reset_url(&mut self) {
        self.url = self.default_url.clone();
    }

    /// Persist the form. Clearing both fields forgets the item.
    pub fn save(&self, store: &ItemConfigStore) -> PluginResult<()> {
        if !self.is_url_valid() {
            return Err(PluginError::InvalidOption {
                option: "url".to_string(),
                message: format!("'{}' is not an http(s) URL", self.url.trim()),
            });
        }
        store.set(&self.title, &self.url, &self.installed_version)
    }
}
