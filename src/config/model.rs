// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [execution]
/// streams = 4
/// strategy = "lazy"
///
/// [specs]
/// dirs = ["specs"]
/// include = ["**/*.spec"]
///
/// [spec_command]
/// cmd = "./run-spec.sh"
/// ```
///
/// Everything except `[spec_command]` is optional. This is the unchecked
/// form; [`ConfigFile`] is obtained through `TryFrom`, which validates it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub execution: ExecutionSection,

    #[serde(default)]
    pub specs: SpecsSection,

    #[serde(default)]
    pub runner: Option<RunnerSection>,

    pub spec_command: SpecCommandSection,

    #[serde(default)]
    pub hooks: HooksSection,

    #[serde(default)]
    pub report: Option<ReportSection>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub execution: ExecutionSection,
    pub specs: SpecsSection,
    pub runner: Option<RunnerSection>,
    pub spec_command: SpecCommandSection,
    pub hooks: HooksSection,
    pub report: Option<ReportSection>,
}

impl ConfigFile {
    /// Wrap an already-validated raw config.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            execution: raw.execution,
            specs: raw.specs,
            runner: raw.runner,
            spec_command: raw.spec_command,
            hooks: raw.hooks,
            report: raw.report,
        }
    }
}

/// `[execution]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionSection {
    /// Requested number of parallel streams. Defaults to the number of CPUs.
    #[serde(default = "default_streams")]
    pub streams: usize,

    /// `"eager"` or `"lazy"`. Kept raw; anything unrecognised means eager.
    #[serde(default)]
    pub strategy: Option<String>,

    /// Label recorded on the suite result.
    #[serde(default)]
    pub tags: Option<String>,
}

pub(crate) fn default_streams() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for ExecutionSection {
    fn default() -> Self {
        Self {
            streams: default_streams(),
            strategy: None,
            tags: None,
        }
    }
}

/// `[specs]` section: where specifications are found.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecsSection {
    #[serde(default = "default_spec_dirs")]
    pub dirs: Vec<String>,

    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_spec_dirs() -> Vec<String> {
    vec!["specs".to_string()]
}

fn default_include() -> Vec<String> {
    vec!["**/*.spec".to_string()]
}

impl Default for SpecsSection {
    fn default() -> Self {
        Self {
            dirs: default_spec_dirs(),
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

/// `[runner]` section: the worker process started once per stream.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    pub cmd: String,
}

/// `[spec_command]` section: run once per spec, with the spec path appended.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecCommandSection {
    pub cmd: String,
}

/// `[hooks]` section: commands run by every stream around its specs.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HooksSection {
    #[serde(default)]
    pub before_suite: Option<String>,

    #[serde(default)]
    pub after_suite: Option<String>,
}

/// `[report]` section: JSON report written by the built-in plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSection {
    pub path: String,
}
