//! Update-check pipeline: resolve settings, fetch, compare, badge.
//!
//! Network and comparison work always runs on a worker thread. Results are
//! posted back through the UI queue and applied to the host window there.

use std::cmp::Ordering;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::fetch::VersionSource;
use super::store::{ItemConfig, ItemConfigStore};
use super::version::compare;
use crate::host::{Badge, HostWindow, Item};
use crate::plugins::{panic_message, PluginError, PluginResult};
use crate::ui_queue::UiHandle;

pub const DEFAULT_STORE_URL: &str = "https://ankergames.net/";
pub const DEFAULT_ITEM_URL_TEMPLATE: &str = "https://ankergames.net/game/{id}";

/// Delay between network requests during a bulk scan.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(200);

/// Store locations used to derive item pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUrls {
    /// Store home page.
    pub home: String,
    /// Item page pattern; `{id}` is replaced by the URL-encoded item id.
    pub item_template: String,
}

impl Default for StoreUrls {
    fn default() -> Self {
        Self {
            home: DEFAULT_STORE_URL.to_string(),
            item_template: DEFAULT_ITEM_URL_TEMPLATE.to_string(),
        }
    }
}

impl StoreUrls {
    /// Store page for an item id; empty when the item has no id.
    pub fn item_url(&self, id: Option<&str>) -> String {
        match id.map(str::trim) {
            Some(id) if !id.is_empty() => self
                .item_template
                .replace("{id}", &urlencoding::encode(id)),
            _ => String::new(),
        }
    }
}

/// Outcome of checking one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Title of the checked item.
    pub item_id: String,
    pub needs_update: bool,
    /// Latest published version; empty if it could not be fetched.
    pub latest_version: String,
    /// Whether the item had both a page URL and an installed version.
    pub is_configured: bool,
}

impl CheckResult {
    fn not_configured(title: &str) -> Self {
        Self {
            item_id: title.to_string(),
            needs_update: false,
            latest_version: String::new(),
            is_configured: false,
        }
    }

    /// Badge to show for this result.
    pub fn badge(&self) -> Badge {
        if self.needs_update {
            Badge::UpdateAvailable {
                latest: self.latest_version.clone(),
            }
        } else if self.is_configured && !self.latest_version.is_empty() {
            Badge::Ready
        } else {
            Badge::None
        }
    }
}

/// Apply a check result to the host window. Runs on the UI thread.
pub fn apply_result(window: &mut dyn HostWindow, result: &CheckResult) {
    if !window.set_badge(&result.item_id, result.badge()) {
        tracing::debug!(item = %result.item_id, "Item no longer shown, dropping badge");
    }
}

/// Runs update checks for library items.
#[derive(Clone)]
pub struct UpdateChecker {
    store: ItemConfigStore,
    urls: StoreUrls,
    source: Arc<dyn VersionSource>,
    throttle: Duration,
}

impl std::fmt::Debug for UpdateChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateChecker")
            .field("store", &self.store)
            .field("urls", &self.urls)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

impl UpdateChecker {
    pub fn new(
        store: ItemConfigStore,
        urls: StoreUrls,
        source: Arc<dyn VersionSource>,
        throttle: Duration,
    ) -> Self {
        Self {
            store,
            urls,
            source,
            throttle,
        }
    }

    pub fn store(&self) -> &ItemConfigStore {
        &self.store
    }

    pub fn urls(&self) -> &StoreUrls {
        &self.urls
    }

    /// Stored settings for `item`, with the URL derived from its id if unset.
    pub fn resolve(&self, item: &Item) -> ItemConfig {
        let mut config = self.store.get(&item.title);
        if config.url.is_empty() {
            config.url = self.urls.item_url(item.id.as_deref());
        }
        config
    }

    /// Whether `item` has everything needed for a check.
    pub fn is_configured(&self, item: &Item) -> bool {
        is_checkable(&self.resolve(item))
    }

    /// Page to open for `item`: saved URL, derived URL, then the store home.
    pub fn item_page(&self, item: Option<&Item>) -> String {
        item.map(|item| self.resolve(item).url)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.urls.home.clone())
    }

    /// Check one item. Blocks on the network when the item is configured.
    pub fn check(&self, item: &Item) -> CheckResult {
        self.check_resolved(&item.title, &self.resolve(item))
    }

    fn check_resolved(&self, title: &str, config: &ItemConfig) -> CheckResult {
        if !is_checkable(config) {
            return CheckResult::not_configured(title);
        }

        let latest = self.source.latest_version(&config.url);
        let needs_update =
            !latest.is_empty() && compare(&config.installed_version, &latest) == Ordering::Less;

        CheckResult {
            item_id: title.to_string(),
            needs_update,
            latest_version: latest,
            is_configured: true,
        }
    }

    /// Check `items` one after another, handing each result to `deliver`.
    ///
    /// Waits for the throttle delay after every network request that is
    /// followed by another item. A panic while checking one item is logged
    /// and the scan moves on. Stops early if `deliver` returns `false`.
    pub fn scan(&self, items: &[Item], mut deliver: impl FnMut(CheckResult) -> bool) {
        for (index, item) in items.iter().enumerate() {
            if item.title.is_empty() {
                continue;
            }

            let config = self.resolve(item);
            let fetches = is_checkable(&config);

            match catch_unwind(AssertUnwindSafe(|| self.check_resolved(&item.title, &config))) {
                Ok(result) => {
                    if !deliver(result) {
                        tracing::debug!("Update scan stopped, UI queue closed");
                        return;
                    }
                }
                Err(payload) => {
                    tracing::warn!(
                        item = %item.title,
                        error = %panic_message(&*payload),
                        "Update check panicked"
                    );
                }
            }

            if fetches && index + 1 < items.len() {
                thread::sleep(self.throttle);
            }
        }
    }

    /// Scan `items` on a background thread, posting results to `ui`.
    pub fn spawn_scan(&self, items: Vec<Item>, ui: UiHandle) -> PluginResult<JoinHandle<()>> {
        let checker = self.clone();
        thread::Builder::new()
            .name("update-scan".to_string())
            .spawn(move || {
                tracing::debug!(items = items.len(), "Update scan started");
                checker.scan(&items, |result| {
                    ui.post(move |window: &mut dyn HostWindow| apply_result(window, &result))
                });
            })
            .map_err(PluginError::Spawn)
    }

    /// Check a single item on a background thread, posting the result to `ui`.
    pub fn spawn_check(&self, item: Item, ui: UiHandle) -> PluginResult<JoinHandle<()>> {
        let checker = self.clone();
        thread::Builder::new()
            .name("update-check".to_string())
            .spawn(move || {
                let result = checker.check(&item);
                ui.post(move |window: &mut dyn HostWindow| apply_result(window, &result));
            })
            .map_err(PluginError::Spawn)
    }
}

fn is_checkable(config: &ItemConfig) -> bool {
    !config.url.is_empty() && !config.installed_version.is_empty()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Version source answering from a fixed table and recording each call.
    #[derive(Default)]
    pub struct FakeSource {
        pub versions: HashMap<String, String>,
        pub calls: Mutex<Vec<(String, Instant)>>,
    }

    impl FakeSource {
        pub fn with(pairs: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                versions: pairs
                    .iter()
                    .map(|(url, version)| (url.to_string(), version.to_string()))
                    .collect(),
                calls: Mutex::default(),
            })
        }

        pub fn urls(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
        }
    }

    impl VersionSource for FakeSource {
        fn latest_version(&self, url: &str) -> String {
            self.calls.lock().unwrap().push((url.to_string(), Instant::now()));
            if url.contains("explode") {
                panic!("source exploded on {url}");
            }
            self.versions.get(url).cloned().unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeSource;
    use super::*;
    use crate::host::testing::RecordingWindow;
    use std::time::Instant;
    use tempfile::TempDir;

    fn checker(temp: &TempDir, source: Arc<FakeSource>, throttle: Duration) -> UpdateChecker {
        UpdateChecker::new(
            ItemConfigStore::new(temp.path().join("settings.json")),
            StoreUrls::default(),
            source,
            throttle,
        )
    }

    #[test]
    fn test_item_url() {
        let urls = StoreUrls::default();
        assert_eq!(urls.item_url(Some("42")), "https://ankergames.net/game/42");
        assert_eq!(urls.item_url(Some("a b/c")), "https://ankergames.net/game/a%20b%2Fc");
        assert_eq!(urls.item_url(Some("  ")), "");
        assert_eq!(urls.item_url(None), "");
    }

    #[test]
    fn test_badge_decision() {
        let mut result = CheckResult {
            item_id: "Game".to_string(),
            needs_update: true,
            latest_version: "2.0".to_string(),
            is_configured: true,
        };
        assert_eq!(result.badge(), Badge::UpdateAvailable { latest: "2.0".to_string() });

        result.needs_update = false;
        assert_eq!(result.badge(), Badge::Ready);

        result.latest_version.clear();
        assert_eq!(result.badge(), Badge::None);

        assert_eq!(CheckResult::not_configured("Game").badge(), Badge::None);
    }

    #[test]
    fn test_unconfigured_items_are_not_fetched() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::with(&[]);
        let checker = checker(&temp, source.clone(), Duration::ZERO);
        checker.store().set("Has URL", "https://example.com/a", "").unwrap();

        let no_version = checker.check(&Item::new("Has URL", None));
        let no_url = checker.check(&Item::new("Nothing", None));

        assert!(!no_version.is_configured);
        assert!(!no_url.is_configured);
        assert!(source.urls().is_empty());
    }

    #[test]
    fn test_check_uses_derived_url_and_compares() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::with(&[("https://ankergames.net/game/7", "V 1.10")]);
        let checker = checker(&temp, source.clone(), Duration::ZERO);
        checker.store().set("Game", "", "V 1.9").unwrap();

        let result = checker.check(&Item::new("Game", Some("7".to_string())));

        assert_eq!(
            result,
            CheckResult {
                item_id: "Game".to_string(),
                needs_update: true,
                latest_version: "V 1.10".to_string(),
                is_configured: true,
            }
        );
        assert_eq!(source.urls(), vec!["https://ankergames.net/game/7"]);
    }

    #[test]
    fn test_fetch_failure_is_configured_without_update() {
        let temp = TempDir::new().unwrap();
        let checker = checker(&temp, FakeSource::with(&[]), Duration::ZERO);
        checker.store().set("Game", "https://example.com/down", "1.0").unwrap();

        let result = checker.check(&Item::new("Game", None));

        assert!(result.is_configured);
        assert!(!result.needs_update);
        assert_eq!(result.latest_version, "");
    }

    #[test]
    fn test_item_page_preference() {
        let temp = TempDir::new().unwrap();
        let checker = checker(&temp, FakeSource::with(&[]), Duration::ZERO);
        checker.store().set("Saved", "https://example.com/saved", "").unwrap();

        assert_eq!(
            checker.item_page(Some(&Item::new("Saved", Some("1".to_string())))),
            "https://example.com/saved"
        );
        assert_eq!(
            checker.item_page(Some(&Item::new("Derived", Some("1".to_string())))),
            "https://ankergames.net/game/1"
        );
        assert_eq!(checker.item_page(Some(&Item::new("Bare", None))), DEFAULT_STORE_URL);
        assert_eq!(checker.item_page(None), DEFAULT_STORE_URL);
    }

    #[test]
    fn test_scan_throttles_between_network_calls() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::with(&[("https://example.com/a", "1"), ("https://example.com/c", "1")]);
        let throttle = Duration::from_millis(60);
        let checker = checker(&temp, source.clone(), throttle);
        checker.store().set("A", "https://example.com/a", "1").unwrap();
        checker.store().set("C", "https://example.com/c", "1").unwrap();

        let items = vec![Item::new("A", None), Item::new("B", None), Item::new("C", None)];
        let mut delivered = Vec::new();
        checker.scan(&items, |result| {
            delivered.push(result.item_id);
            true
        });

        assert_eq!(delivered, vec!["A", "B", "C"]);
        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].1.duration_since(calls[0].1) >= throttle);
    }

    #[test]
    fn test_scan_skips_delay_without_network() {
        let temp = TempDir::new().unwrap();
        let checker = checker(&temp, FakeSource::with(&[]), Duration::from_secs(30));
        let items: Vec<Item> = (0..5).map(|i| Item::new(format!("Game {i}"), None)).collect();

        let started = Instant::now();
        let mut delivered = 0;
        checker.scan(&items, |_| {
            delivered += 1;
            true
        });

        assert_eq!(delivered, 5);
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn test_scan_skips_untitled_items() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::with(&[("https://ankergames.net/game/a", "2.0")]);
        let checker = checker(&temp, source.clone(), Duration::ZERO);
        let items = [Item::new("", Some("blank".to_string())), Item::new("A", Some("a".to_string()))];

        let mut delivered = Vec::new();
        checker.scan(&items, |result| {
            delivered.push(result);
            true
        });

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].item_id, "A");
        assert_eq!(source.urls(), vec!["https://ankergames.net/game/a".to_string()]);
    }

    #[test]
    fn test_scan_survives_panicking_source() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::with(&[("https://example.com/ok", "2.0")]);
        let checker = checker(&temp, source.clone(), Duration::ZERO);
        checker.store().set("Bad", "https://example.com/explode", "1.0").unwrap();
        checker.store().set("Good", "https://example.com/ok", "1.0").unwrap();

        let mut delivered = Vec::new();
        checker.scan(&[Item::new("Bad", None), Item::new("Good", None)], |result| {
            delivered.push(result);
            true
        });

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].item_id, "Good");
        assert!(delivered[0].needs_update);
    }

    #[test]
    fn test_scan_stops_when_delivery_fails() {
        let temp = TempDir::new().unwrap();
        let checker = checker(&temp, FakeSource::with(&[]), Duration::ZERO);
        let items = vec![Item::new("A", None), Item::new("B", None)];

        let mut attempts = 0;
        checker.scan(&items, |_| {
            attempts += 1;
            false
        });

        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_spawned_scan_posts_badges_to_ui_queue() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::with(&[("https://example.com/a", "2.0"), ("https://example.com/b", "1.0")]);
        let checker = checker(&temp, source, Duration::ZERO);
        checker.store().set("A", "https://example.com/a", "1.0").unwrap();
        checker.store().set("B", "https://example.com/b", "1.0").unwrap();

        let mut window = RecordingWindow::with_items(vec![
            Item::new("A", None),
            Item::new("B", None),
            Item::new("C", None),
        ]);
        checker
            .spawn_scan(window.items.clone(), window.ui_handle())
            .unwrap()
            .join()
            .unwrap();

        // Nothing changes until the UI thread drains the queue.
        assert!(window.badges.is_empty());
        assert_eq!(window.pump(), 3);
        assert_eq!(window.badges["A"], Badge::UpdateAvailable { latest: "2.0".to_string() });
        assert_eq!(window.badges["B"], Badge::Ready);
        assert_eq!(window.badges["C"], Badge::None);
    }

    #[test]
    fn test_spawned_check_for_removed_item() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::with(&[("https://example.com/gone", "2.0")]);
        let checker = checker(&temp, source, Duration::ZERO);
        checker.store().set("Gone", "https://example.com/gone", "1.0").unwrap();

        let mut window = RecordingWindow::default();
        checker
            .spawn_check(Item::new("Gone", None), window.ui_handle())
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(window.pump(), 1);
        assert!(window.badges.is_empty());
    }
}
