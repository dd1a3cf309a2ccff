//! Repository discovery
//!
//! Walks a directory tree once, asking git at every directory whether it sits
//! inside a working tree. When it does, the working tree's top level is
//! recorded and, unless nested repositories are wanted, nothing below that
//! directory is visited.

use dashmap::DashSet;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::git::{is_inside_work_tree, show_toplevel, Runner};

const GIT_DIR_NAME: &str = ".git";

/// Finds the top-level paths of all git working trees under `root`
///
/// Paths come back in depth-first visiting order (entries sorted by file
/// name). With `include_nested` the same top level may be reported several
/// times, once per directory that resolves to it; callers de-duplicate.
/// Any traversal error aborts the search.
pub fn find_repositories<R: Runner + ?Sized>(
    runner: &R,
    root: impl AsRef<Path>,
    include_nested: bool,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    // Directories whose subtree belongs to an already recorded repository
    let claimed: Arc<DashSet<PathBuf>> = Arc::new(DashSet::new());
    let claimed_filter = Arc::clone(&claimed);

    let walker = WalkBuilder::new(root)
        .standard_filters(false) // Visit everything, ignore files included
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.file_name() == GIT_DIR_NAME {
                return false;
            }
            match entry.path().parent() {
                Some(parent) => !claimed_filter.contains(parent),
                None => true,
            }
        })
        .build();

    let mut found = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }

        let dir = entry.path();
        if !is_inside_work_tree(runner, dir)? {
            continue;
        }

        let top_level = PathBuf::from(show_toplevel(runner, dir)?);
        log::debug!("found repository {} (via {})", top_level.display(), dir.display());
        found.push(top_level);

        if !include_nested {
            claimed.insert(dir.to_path_buf());
        }
    }

    log::info!("{} repositories found under {}", found.len(), root.display());
    Ok(found)
}

/// Removes repeated top-level paths, keeping the first occurrence
pub fn dedup_repositories(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::with_capacity(paths.len());
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
