// src/errors.rs

//! Crate-wide error type.
//!
//! Only configuration problems, plugin start-up failures and similar hard
//! errors travel through [`ParspecError`]. Per-stream failures never do: they
//! are recorded as values inside the returned suite result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParspecError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to start plugins: {0}")]
    PluginStart(String),

    #[error("No specifications found: {0}")]
    NoSpecs(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ParspecError>;
