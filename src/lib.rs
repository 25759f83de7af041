// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod event;
pub mod exec;
pub mod logging;
pub mod manifest;
pub mod plugin;
pub mod result;
pub mod spec;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::engine::{
    Collaborators, Distribution, ExecutionOptions, ParallelExecution, effective_streams,
};
use crate::errors::ParspecError;
use crate::event::TracingEventBus;
use crate::exec::{CommandExecutor, ProcessLauncher};
use crate::manifest::Manifest;
use crate::plugin::ReportPluginHost;
use crate::result::SuiteResult;
use crate::spec::{SpecCollection, discover_specs};
use crate::types::Strategy;

/// Environment variable consulted when neither flag nor file sets a strategy.
pub const STRATEGY_ENV: &str = "PARSPEC_STRATEGY";

/// What a call to [`run`] ended with.
#[derive(Debug)]
pub enum RunOutcome {
    DryRun,
    Finished(SuiteResult),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::DryRun => true,
            RunOutcome::Finished(result) => !result.is_failed,
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - spec discovery
/// - the production launcher, executor, plugins and event bus
/// - the parallel execution coordinator
pub async fn run(args: CliArgs) -> Result<RunOutcome> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let root = config_root_dir(&config_path);

    let env_strategy = std::env::var(STRATEGY_ENV).ok();
    let options = ExecutionOptions {
        streams: args.streams.unwrap_or(cfg.execution.streams),
        strategy: resolve_strategy(
            args.strategy.as_deref(),
            cfg.execution.strategy.as_deref(),
            env_strategy.as_deref(),
        ),
        tags: args.tags.clone().or_else(|| cfg.execution.tags.clone()),
    };

    let specs = collect_specs(&args, &cfg, &root)?;
    if specs.is_empty() {
        warn!("no specifications matched; nothing will be executed");
    }
    info!(
        specs = specs.size(),
        requested_streams = options.streams,
        strategy = %options.strategy,
        "specifications collected"
    );

    if args.dry_run {
        print_dry_run(&specs, &options);
        return Ok(RunOutcome::DryRun);
    }

    let manifest = Arc::new(Manifest::from_config(&cfg, root));
    let collaborators = Collaborators {
        launcher: Arc::new(ProcessLauncher::new()),
        executor: Arc::new(CommandExecutor::new(Arc::clone(&manifest))),
        plugins: Arc::new(ReportPluginHost),
        events: Arc::new(TracingEventBus),
    };

    let execution = ParallelExecution::new(manifest, specs, options, collaborators);
    let suite = execution.run().await?;

    print_summary(&suite);
    Ok(RunOutcome::Finished(suite))
}

/// First set source wins: CLI flag, then config file, then environment.
pub fn resolve_strategy(
    flag: Option<&str>,
    file: Option<&str>,
    env: Option<&str>,
) -> Strategy {
    Strategy::from(flag.or(file).or(env))
}

/// Directory the config lives in, or the current directory for a bare
/// filename like `Parspec.toml`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Spec paths from the command line win over `[specs].dirs`.
fn collect_specs(args: &CliArgs, cfg: &ConfigFile, root: &Path) -> Result<SpecCollection> {
    let paths: Vec<PathBuf> = if args.paths.is_empty() {
        cfg.specs.dirs.iter().map(|d| root.join(d)).collect()
    } else {
        args.paths.iter().map(PathBuf::from).collect()
    };

    if let Some(missing) = paths.iter().find(|p| !p.exists()) {
        return Err(ParspecError::NoSpecs(format!("{} does not exist", missing.display())).into());
    }

    discover_specs(&paths, &cfg.specs.include, &cfg.specs.exclude)
}

fn print_dry_run(specs: &SpecCollection, options: &ExecutionOptions) {
    let streams = effective_streams(options.streams, specs.size());
    println!("parspec dry-run");
    println!("  specs = {}", specs.size());
    println!("  requested streams = {}", options.streams);
    println!("  effective streams = {streams}");
    println!("  strategy = {}", options.strategy);
    if let Some(tags) = &options.tags {
        println!("  tags = {tags}");
    }
    println!();

    match Distribution::plan(specs.clone(), streams, options.strategy) {
        Distribution::Eager(buckets) => {
            for (i, bucket) in buckets.iter().enumerate() {
                println!("stream {} ({} specs):", i + 1, bucket.size());
                for name in bucket.spec_names() {
                    println!("  - {name}");
                }
            }
        }
        Distribution::Lazy { .. } => {
            println!("{streams} streams pull from one shared queue:");
            for name in specs.spec_names() {
                println!("  - {name}");
            }
        }
    }

    debug!("dry-run complete (no execution)");
}

fn print_summary(suite: &SuiteResult) {
    println!();
    println!(
        "Specifications: {} executed, {} passed, {} failed, {} skipped",
        suite.specs_executed(),
        suite.specs_passed(),
        suite.specs_failed_count,
        suite.specs_skipped_count
    );
    for error in &suite.unhandled_errors {
        println!("{error}");
    }
    println!(
        "Total time taken: {}ms ({} streams, {})",
        suite.execution_time.as_millis(),
        suite.streams,
        suite.strategy
    );
}
