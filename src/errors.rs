// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AssetdagError>;

/// Flatten an error and all of its causes into user-facing messages.
///
/// Messages are ordered from the outermost context to the innermost cause.
/// `None` yields an empty list.
pub fn unwrap_all_errors(err: Option<&anyhow::Error>) -> Vec<String> {
    match err {
        Some(err) => err.chain().map(|cause| cause.to_string()).collect(),
        None => Vec::new(),
    }
}
