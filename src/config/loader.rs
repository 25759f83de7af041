// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File name looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Parspec.toml";

/// Read and deserialize `path` without semantic checks.
///
/// A missing or unreadable file surfaces as `ParspecError::IoError`, a
/// malformed one (including a missing `[spec_command]`) as `TomlError`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    debug!(config = ?path, "reading configuration");
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

/// [`load_from_path`] followed by validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}
