//! Display names derived from repository paths

use std::path::{Component, Path, PathBuf};

/// The names a repository is known by in the output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryNames {
    /// Last path segment
    pub short_name: String,
    /// Path relative to the deepest directory shared by all repositories
    pub unique_name: String,
    /// First segment of `unique_name`
    pub top_level_group: String,
}

/// Longest leading run of path components shared by every path
///
/// Works on whole components, so `/src/app` and `/src/application` share
/// `/src`, not `/src/app`.
pub fn common_prefix(paths: &[PathBuf]) -> PathBuf {
    let Some((first, rest)) = paths.split_first() else {
        return PathBuf::new();
    };

    let mut shared: Vec<Component<'_>> = first.components().collect();
    for path in rest {
        let matching = shared
            .iter()
            .zip(path.components())
            .take_while(|(a, b)| *a == b)
            .count();
        shared.truncate(matching);
    }

    shared.iter().collect()
}

fn last_segment(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

fn first_segment(name: &str) -> String {
    Path::new(name)
        .components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Computes short, unique and group names for each path, in input order
pub fn name_repositories(paths: &[PathBuf]) -> Vec<RepositoryNames> {
    if let [only] = paths {
        let short_name = last_segment(only);
        return vec![RepositoryNames {
            unique_name: short_name.clone(),
            top_level_group: short_name.clone(),
            short_name,
        }];
    }

    let mut prefix = common_prefix(paths);
    // An ancestor repository would otherwise get an empty name
    if paths.iter().any(|p| *p == prefix) {
        prefix.pop();
    }

    paths
        .iter()
        .map(|path| {
            let unique_name = match path.strip_prefix(&prefix) {
                Ok(rest) if !rest.as_os_str().is_empty() => rest.display().to_string(),
                _ => path.display().to_string(),
            };
            RepositoryNames {
                short_name: last_segment(path),
                top_level_group: first_segment(&unique_name),
                unique_name,
            }
        })
        .collect()
}
