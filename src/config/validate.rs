// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ParspecError, Result};
use crate::spec::discover::build_globset;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ParspecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_execution(cfg)?;
    validate_commands(cfg)?;
    validate_specs(cfg)?;
    Ok(())
}

fn validate_execution(cfg: &RawConfigFile) -> Result<()> {
    if cfg.execution.streams == 0 {
        return Err(ParspecError::ConfigError(
            "[execution].streams must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    if cfg.spec_command.cmd.trim().is_empty() {
        return Err(ParspecError::ConfigError(
            "[spec_command].cmd must not be empty".to_string(),
        ));
    }
    if let Some(runner) = &cfg.runner {
        if runner.cmd.trim().is_empty() {
            return Err(ParspecError::ConfigError(
                "[runner].cmd must not be empty when [runner] is present".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_specs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.specs.include.is_empty() {
        return Err(ParspecError::ConfigError(
            "[specs].include must contain at least one pattern".to_string(),
        ));
    }
    for (field, patterns) in [("include", &cfg.specs.include), ("exclude", &cfg.specs.exclude)] {
        build_globset(patterns)
            .map_err(|e| ParspecError::ConfigError(format!("[specs].{field}: {e:#}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml_src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = parse("[spec_command]\ncmd = \"./run.sh\"\n").unwrap();

        assert!(cfg.execution.streams >= 1);
        assert_eq!(cfg.execution.strategy, None);
        assert_eq!(cfg.specs.dirs, vec!["specs"]);
        assert_eq!(cfg.specs.include, vec!["**/*.spec"]);
        assert!(cfg.runner.is_none());
    }

    #[test]
    fn zero_streams_rejected() {
        let err = parse("[execution]\nstreams = 0\n[spec_command]\ncmd = \"x\"\n").unwrap_err();
        assert!(matches!(err, ParspecError::ConfigError(msg) if msg.contains("streams")));
    }

    #[test]
    fn bogus_strategy_is_not_a_config_error() {
        let cfg = parse("[execution]\nstrategy = \"bogus\"\n[spec_command]\ncmd = \"x\"\n").unwrap();
        assert_eq!(cfg.execution.strategy.as_deref(), Some("bogus"));
    }

    #[test]
    fn bad_glob_rejected() {
        let err = parse("[specs]\ninclude = [\"a/[\"]\n[spec_command]\ncmd = \"x\"\n").unwrap_err();
        assert!(matches!(err, ParspecError::ConfigError(msg) if msg.contains("include")));
    }
}
