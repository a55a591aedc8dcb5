//! Manifest scaffolding over the incorrect-examples tree

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{ScaffoldConfig, ScaffoldMode};
use crate::errors::{FixtureError, Result};
use crate::fixture::{temp_file_name, write_atomic};

use super::{ErrorKinds, ExampleEntry, Manifest};

/// What happened to one category directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub dir: PathBuf,
    /// Entries in the written manifest
    pub examples: usize,
    /// Entries whose classification was carried over from the previous manifest
    pub preserved: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub written: Vec<CategoryOutcome>,
    /// Category directories without example files; no manifest was written for them
    pub skipped: Vec<PathBuf>,
    /// Files that cannot be recorded in a manifest because their names are not valid UTF-8
    pub unlisted: Vec<PathBuf>,
}

/// Write a manifest into every category directory below `config.root`.
///
/// Every directory strictly below the root is a category; its immediate regular files are its examples.
#[tracing::instrument(skip_all, fields(root = %config.root.display(), mode = ?config.mode))]
pub fn scaffold(config: &ScaffoldConfig) -> Result<ScaffoldReport> {
    config.validate()?;

    let mut categories = Vec::new();
    collect_dirs(&config.root, &mut categories)?;

    let mut report = ScaffoldReport::default();
    for dir in categories {
        let files = list_examples(&dir, &config.file_name, &mut report.unlisted)?;
        if files.is_empty() {
            tracing::debug!("no examples in {}, skipping", dir.display());
            report.skipped.push(dir);
            continue;
        }

        let manifest_path = dir.join(&config.file_name);
        let previous = match config.mode {
            ScaffoldMode::Regenerate => HashMap::new(),
            ScaffoldMode::Merge => load_classifications(&manifest_path)?,
        };

        let mut preserved = 0;
        let examples: Vec<ExampleEntry> = files
            .into_iter()
            .map(|path| match previous.get(&path) {
                Some(errors) => {
                    preserved += 1;
                    ExampleEntry {
                        path,
                        errors: errors.clone(),
                    }
                }
                None => ExampleEntry::placeholder(path),
            })
            .collect();

        let dropped = previous.len() - preserved;
        if dropped > 0 {
            tracing::warn!(
                "dropping {} entr{} for files no longer in {}",
                dropped,
                if dropped == 1 { "y" } else { "ies" },
                dir.display()
            );
        }

        let manifest = Manifest { examples };
        let json = manifest.to_json().map_err(|e| FixtureError::Manifest {
            path: manifest_path.clone(),
            source: e,
        })?;
        write_atomic(&manifest_path, &json)?;
        tracing::info!(
            "wrote {} ({} examples, {} preserved)",
            manifest_path.display(),
            manifest.len(),
            preserved
        );

        report.written.push(CategoryOutcome {
            dir,
            examples: manifest.len(),
            preserved,
        });
    }

    Ok(report)
}

/// Collect every directory below `root` (excluding `root`), depth first, in name order.
fn collect_dirs(root: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for path in sorted_entries(root)? {
        let file_type = fs::symlink_metadata(&path)
            .map_err(|e| FixtureError::io(&path, e))?
            .file_type();
        if file_type.is_dir() {
            out.push(path.clone());
            collect_dirs(&path, out)?;
        }
    }
    Ok(())
}

/// Names of the regular files directly inside `dir`, sorted, minus the manifest and its temporary sibling.
///
/// Files whose names are not UTF-8 cannot be written to JSON and are pushed onto `unlisted` instead.
fn list_examples(dir: &Path, manifest_name: &str, unlisted: &mut Vec<PathBuf>) -> Result<Vec<String>> {
    let manifest_tmp = temp_file_name(manifest_name);
    let mut names = Vec::new();
    for path in sorted_entries(dir)? {
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("cannot list non UTF-8 file name {}", path.display());
            unlisted.push(path);
            continue;
        };
        if name == manifest_name || name == manifest_tmp {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| FixtureError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FixtureError::io(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Classifications recorded in an existing manifest, keyed by example path. Missing manifest means none.
fn load_classifications(path: &Path) -> Result<HashMap<String, ErrorKinds>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(FixtureError::io(path, e)),
    };
    let manifest = Manifest::from_json(&json).map_err(|e| FixtureError::Manifest {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(manifest
        .examples
        .into_iter()
        .map(|entry| (entry.path, entry.errors))
        .collect())
}
