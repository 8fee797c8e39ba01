//! Error types for the plugin host
//!
//! Provides standardized error handling across the crate.

use thiserror::Error;

use crate::plugins::PluginError;

/// Errors that can occur while starting or configuring the plugin host
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Plugin loading or execution errors
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization errors
    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for host operations
pub type HostResult<T> = Result<T, HostError>;
