// src/config/mod.rs

//! Configuration loading and validation for parspec.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//!
//! The distribution strategy is deliberately not validated: it is resolved
//! by `Strategy::parse_or_default`, which never fails.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, ExecutionSection, HooksSection, RawConfigFile, ReportSection, RunnerSection,
    SpecCommandSection, SpecsSection,
};
