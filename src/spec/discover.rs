// src/spec/discover.rs

//! Finding specification files on disk.
//!
//! Explicit file arguments are always taken as-is. Directories are walked
//! recursively and each file is matched, relative to that directory, against
//! the include/exclude glob sets. Results are sorted per directory so the
//! collection order is stable between runs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::spec::{SpecCollection, Specification};

/// Compile a list of glob patterns into a set.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("building glob set")
}

/// Collect every specification under `paths`.
pub fn discover_specs(
    paths: &[PathBuf],
    include: &[String],
    exclude: &[String],
) -> Result<SpecCollection> {
    let include = build_globset(include)?;
    let exclude = build_globset(exclude)?;

    let mut seen = HashSet::new();
    let mut specs = Vec::new();

    for root in paths {
        if root.is_file() {
            push_unique(&mut specs, &mut seen, root.clone());
            continue;
        }

        let mut found = Vec::new();
        walk(root, &mut found).with_context(|| format!("scanning spec directory {root:?}"))?;
        found.sort();

        for path in found {
            let Some(rel) = relative_str(root, &path) else {
                continue;
            };
            if include.is_match(&rel) && !exclude.is_match(&rel) {
                push_unique(&mut specs, &mut seen, path);
            }
        }
    }

    debug!(count = specs.len(), "discovered specifications");
    Ok(SpecCollection::new(specs))
}

fn push_unique(specs: &mut Vec<Specification>, seen: &mut HashSet<PathBuf>, path: PathBuf) {
    if seen.insert(path.clone()) {
        specs.push(Specification::from_path(path));
    }
}

/// Symlinks are never followed into directories, so link cycles terminate.
fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading dir {dir:?}"))? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(&path, out)?;
        } else if file_type.is_symlink() && path.is_dir() {
            debug!(link = ?path, "not following symlinked directory");
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// `path` relative to `root`, with forward slashes.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
