//! Remote version lookup over HTTP.

use std::time::Duration;

use reqwest::blocking::Client;

use super::extract::extract_version;
use crate::plugins::PluginResult;

/// Browser-like agent string; some store pages refuse unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the update checker gets the latest published version of an item.
pub trait VersionSource: Send + Sync {
    /// Latest version shown at `url`, or an empty string if unknown.
    ///
    /// Never fails: every error collapses to an empty string.
    fn latest_version(&self, url: &str) -> String;
}

/// Fetches store item pages and reads the version badge.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> PluginResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client, e.g. one with custom proxy settings.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and decode the body with its declared charset (UTF-8 if none).
    pub fn fetch_page(&self, url: &str) -> PluginResult<String> {
        let body = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .text_with_charset("utf-8")?;
        Ok(body)
    }
}

impl VersionSource for HttpFetcher {
    fn latest_version(&self, url: &str) -> String {
        if url.is_empty() {
            return String::new();
        }

        match self.fetch_page(url) {
            Ok(html) => extract_version(&html),
            Err(e) => {
                tracing::debug!(url, error = %e, "Failed to fetch item page");
                String::new()
            }
        }
    }
}
