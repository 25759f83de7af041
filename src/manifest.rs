// src/manifest.rs

use std::path::PathBuf;

use crate::config::ConfigFile;

/// Project description handed to worker processes and plugins.
///
/// Built once from a validated [`ConfigFile`] and shared read-only by every
/// stream.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Directory relative commands run from.
    pub project_root: PathBuf,
    /// Long-running worker command launched once per stream, if any.
    pub runner: Option<String>,
    /// Command run once per spec; the spec path is appended.
    pub spec_command: String,
    pub before_suite: Option<String>,
    pub after_suite: Option<String>,
    /// Where the JSON report plugin writes the suite result.
    pub report: Option<PathBuf>,
}

impl Manifest {
    pub fn from_config(cfg: &ConfigFile, project_root: PathBuf) -> Self {
        Self {
            runner: cfg.runner.as_ref().map(|r| r.cmd.clone()),
            spec_command: cfg.spec_command.cmd.clone(),
            before_suite: cfg.hooks.before_suite.clone(),
            after_suite: cfg.hooks.after_suite.clone(),
            report: cfg
                .report
                .as_ref()
                .map(|r| project_root.join(&r.path)),
            project_root,
        }
    }
}
