//! Core error types for rituals-core.
//!
//! The timing and navigation code is infallible; errors only surface at the
//! edges: resolving ritual references, parsing user input, and touching disk.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rituals-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A ritual id that is not present in the catalog
    #[error("Unknown ritual '{0}'")]
    UnknownRitual(String),

    /// A `next` reference that leads back into a ritual already being expanded
    #[error("Cyclic ritual reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// A duration string that is neither `MM:SS` nor `H:MM:SS`
    #[error("Invalid duration '{0}': expected MM:SS or H:MM:SS")]
    InvalidDuration(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Dot-path key that does not name a config field
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
