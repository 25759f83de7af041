// src/plugin/report.rs

//! Built-in JSON report plugin.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::errors::Error;
use crate::manifest::Manifest;
use crate::plugin::{PluginHandle, PluginHost, PluginMessage};

/// Writes the suite result notification to `manifest.report`, if set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPluginHost;

impl PluginHost for ReportPluginHost {
    fn start_all(&self, manifest: &Manifest) -> Result<Box<dyn PluginHandle>, Error> {
        if let Some(path) = &manifest.report {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating report directory {parent:?}"))?;
            }
            info!(report = ?path, "report plugin started");
        } else {
            debug!("no report configured; report plugin idle");
        }

        Ok(Box::new(ReportPluginHandle {
            path: manifest.report.clone(),
            written: false,
        }))
    }
}

#[derive(Debug)]
pub struct ReportPluginHandle {
    path: Option<PathBuf>,
    written: bool,
}

impl PluginHandle for ReportPluginHandle {
    fn notify(&mut self, message: &PluginMessage) {
        let Some(path) = &self.path else {
            return;
        };

        let written = message
            .to_json()
            .context("serialising plugin message")
            .and_then(|json| {
                fs::write(path, json).with_context(|| format!("writing report to {path:?}"))
            });

        match written {
            Ok(()) => {
                self.written = true;
                info!(report = ?path, "suite report written");
            }
            Err(e) => warn!(error = %format!("{e:#}"), "report plugin failed"),
        }
    }

    fn kill_all_gracefully(&mut self) {
        debug!(written = self.written, "report plugin stopped");
    }
}
