// src/logging.rs

//! `tracing` subscriber setup.
//!
//! The filter comes from, in order:
//! 1. `--log-level` on the command line
//! 2. `PARSPEC_LOG`, which accepts full `EnvFilter` directives such as
//!    `warn,parspec::engine=trace`
//! 3. `info`
//!
//! Output goes to stderr; stdout is reserved for the run summary.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "PARSPEC_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.directive());
    }
    env.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    fn hint(cli: Option<LogLevel>, env: Option<&str>) -> Option<LevelFilter> {
        build_filter(cli, env).max_level_hint()
    }

    #[test]
    fn cli_level_beats_env() {
        assert_eq!(hint(Some(LogLevel::Debug), Some("error")), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn env_directives_are_kept() {
        assert_eq!(
            hint(None, Some(" warn,parspec::engine=trace ")),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn unusable_env_falls_back_to_info() {
        assert_eq!(hint(None, Some("")), Some(LevelFilter::INFO));
        assert_eq!(hint(None, None), Some(LevelFilter::INFO));
    }
}
