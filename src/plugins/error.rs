//! Error types for the plugin system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the plugin system.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Entry file not found in plugin directory: {0}")]
    EntryFileNotFound(PathBuf),

    #[error("Invalid entry file {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("Plugin '{plugin}' names unknown entry '{entry}'")]
    UnknownEntry { plugin: String, entry: String },

    #[error("Plugin '{0}' has no init entry point")]
    MissingInit(String),

    #[error("Plugin '{0}' is already loaded")]
    AlreadyLoaded(String),

    #[error("Plugin '{plugin}' panicked in {hook}: {message}")]
    Panicked {
        plugin: String,
        hook: String,
        message: String,
    },

    #[error("Invalid option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    #[error("Failed to start background thread: {0}")]
    Spawn(std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to write {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("{0}")]
    Failed(String),
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;
