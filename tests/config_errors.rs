// tests/config_errors.rs

use std::fs;

use tempfile::tempdir;

use parspec::config::load_and_validate;
use parspec::errors::ParspecError;

fn load(src: &str) -> Result<parspec::config::ConfigFile, ParspecError> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Parspec.toml");
    fs::write(&path, src).unwrap();
    load_and_validate(&path)
}

#[test]
fn full_config_loads() {
    let cfg = load(
        r#"
[execution]
streams = 3
strategy = "lazy"
tags = "smoke"

[specs]
dirs = ["acceptance"]
include = ["**/*.feature"]
exclude = ["**/wip/**"]

[runner]
cmd = "./start-runner.sh"

[spec_command]
cmd = "./run.sh"

[hooks]
before_suite = "./setup.sh"
after_suite = "./teardown.sh"

[report]
path = "reports/suite.json"
"#,
    )
    .unwrap();

    assert_eq!(cfg.execution.streams, 3);
    assert_eq!(cfg.execution.strategy.as_deref(), Some("lazy"));
    assert_eq!(cfg.execution.tags.as_deref(), Some("smoke"));
    assert_eq!(cfg.specs.exclude, vec!["**/wip/**"]);
    assert_eq!(cfg.runner.unwrap().cmd, "./start-runner.sh");
    assert_eq!(cfg.hooks.before_suite.as_deref(), Some("./setup.sh"));
    assert_eq!(cfg.report.unwrap().path, "reports/suite.json");
}

#[test]
fn zero_streams_is_config_error() {
    let err = load("[execution]\nstreams = 0\n[spec_command]\ncmd = \"x\"\n").unwrap_err();
    assert!(matches!(err, ParspecError::ConfigError(msg) if msg.contains("streams")));
}

#[test]
fn bad_exclude_glob_is_config_error() {
    let err = load("[specs]\nexclude = [\"[\"]\n[spec_command]\ncmd = \"x\"\n").unwrap_err();
    assert!(matches!(err, ParspecError::ConfigError(msg) if msg.contains("exclude")));
}

#[test]
fn missing_spec_command_is_toml_error() {
    let err = load("[execution]\nstreams = 2\n").unwrap_err();
    assert!(matches!(err, ParspecError::TomlError(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_and_validate(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ParspecError::IoError(_)));
}
