// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `parspec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "parspec",
    version,
    about = "Run test specifications across parallel worker processes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Relative spec directories and commands resolve against the directory
    /// this file lives in.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Requested number of parallel streams.
    ///
    /// Clamped to the number of specifications found.
    #[arg(short = 'n', long, value_name = "N")]
    pub streams: Option<usize>,

    /// Distribution strategy: `eager` or `lazy`.
    ///
    /// Anything else falls back to `eager`.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Tag expression recorded on the suite result.
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PARSPEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve specs, streams and buckets, print them, but launch nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Spec files or directories. Overrides `[specs].dirs`.
    #[arg(value_name = "SPEC_PATHS")]
    pub paths: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
