// src/spec/mod.rs

//! Specifications and the collections the coordinator distributes.
//!
//! - [`queue`] holds the shared pull cursor used by the lazy strategy.
//! - [`discover`] finds specification files on disk.

pub mod discover;
pub mod queue;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use discover::discover_specs;
pub use queue::SpecQueue;

/// A named unit of work. Identity is its name; never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Specification {
    name: String,
    path: PathBuf,
}

impl Specification {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a specification whose name is the path itself.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.to_string_lossy().replace('\\', "/");
        Self { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered collection of specifications with an immutable size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecCollection {
    specs: Vec<Specification>,
}

impl SpecCollection {
    pub fn new(specs: Vec<Specification>) -> Self {
        Self { specs }
    }

    pub fn size(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[Specification] {
        &self.specs
    }

    pub fn spec_names(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.name.clone()).collect()
    }

    pub fn into_specs(self) -> Vec<Specification> {
        self.specs
    }
}

impl From<Vec<Specification>> for SpecCollection {
    fn from(specs: Vec<Specification>) -> Self {
        Self::new(specs)
    }
}

impl FromIterator<Specification> for SpecCollection {
    fn from_iter<I: IntoIterator<Item = Specification>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
