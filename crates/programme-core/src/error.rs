//! Error types for document loading and configuration.

use std::path::PathBuf;

/// Failure to obtain or decode the programme document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{source_name} is not a valid programme document: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to load or validate the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
