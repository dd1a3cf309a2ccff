//! Porcelain v2 status extraction and ahead/behind classification
//!
//! Each annotation kind in `git status --branch --porcelain=2` output is read by
//! its own rule below. A missing line is never an error; a present line that
//! does not have the expected shape is.

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

use super::operations::{command_line, Runner};
use crate::error::{Error, Result};

static AHEAD_BEHIND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# branch\.ab \+(\S*) -(\S*)\s*$").expect("valid regex"));
static TRACKED_CHANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[^#?\r\n]").expect("valid regex"));
static UNTRACKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\?").expect("valid regex"));
static STASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# stash \d+\s*$").expect("valid regex"));
static BRANCH_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# branch\.head (.+?)\s*$").expect("valid regex"));
static BRANCH_UPSTREAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# branch\.upstream (.+?)\s*$").expect("valid regex"));

/// Synchronization of a branch with its upstream, derived from ahead/behind counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    /// Nothing to push, nothing to merge
    Synced,
    /// Upstream has commits the local branch lacks (ready for merge)
    RemoteAhead,
    /// Local branch has commits the upstream lacks (ready for push)
    LocalAhead,
    /// Both sides have their own commits
    Diverged,
}

impl SyncStatus {
    /// Returns the symbol shown in the ahead/behind column
    pub fn symbol(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "✓",
            SyncStatus::RemoteAhead => "↘",
            SyncStatus::LocalAhead => "↗",
            SyncStatus::Diverged => "↹",
        }
    }

    /// Returns the text representation of this status
    pub fn text(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::RemoteAhead => "ready for merge",
            SyncStatus::LocalAhead => "ready for push",
            SyncStatus::Diverged => "diverged",
        }
    }
}

/// Classifies an (ahead, behind) pair; total over all inputs
pub fn classify(ahead: u32, behind: u32) -> SyncStatus {
    match (ahead, behind) {
        (0, 0) => SyncStatus::Synced,
        (0, _) => SyncStatus::RemoteAhead,
        (_, 0) => SyncStatus::LocalAhead,
        _ => SyncStatus::Diverged,
    }
}

/// Reads `# branch.ab +A -B`
///
/// Returns `Ok(None)` when no upstream is tracked. Counts that are not
/// non-negative integers mean the output format changed and are reported.
pub fn parse_ahead_behind(porcelain: &str) -> Result<Option<(u32, u32)>> {
    let Some(caps) = AHEAD_BEHIND.captures(porcelain) else {
        return Ok(None);
    };
    let count = |index: usize, what: &str| -> Result<u32> {
        let raw = caps.get(index).map_or("", |m| m.as_str());
        raw.parse::<u32>().map_err(|e| Error::Parse {
            command: "git status --porcelain=2".to_string(),
            message: format!("{what} count {raw:?}: {e}"),
        })
    };
    Ok(Some((count(1, "ahead")?, count(2, "behind")?)))
}

/// Any entry line for a tracked path (ordinary, renamed or unmerged)
pub fn has_tracked_changes(porcelain: &str) -> bool {
    TRACKED_CHANGE.is_match(porcelain)
}

/// Any `?` entry line
pub fn has_untracked(porcelain: &str) -> bool {
    UNTRACKED.is_match(porcelain)
}

/// A `# stash N` header is present; the count itself does not matter
pub fn has_stash(porcelain: &str) -> bool {
    STASH.is_match(porcelain)
}

/// Value of `# branch.head`, e.g. `main` or `(detached)`
pub fn parse_branch_head(porcelain: &str) -> Option<String> {
    capture_value(&BRANCH_HEAD, porcelain)
}

/// Value of `# branch.upstream`, conventionally `remote/branch`
pub fn parse_branch_upstream(porcelain: &str) -> Option<String> {
    capture_value(&BRANCH_UPSTREAM, porcelain)
}

fn capture_value(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Which parts of the status to compute for a repository
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusOptions {
    pub dirty: bool,
    pub untracked: bool,
    pub stash: bool,
    pub branch_head: bool,
    /// Upstream is needed for display, or by the URL / fetch-need queries
    pub branch_upstream: bool,
    pub include_nested: bool,
}

/// Builds the `git status` invocation for the requested options
pub fn status_args(options: &StatusOptions) -> Vec<&'static str> {
    let mut args = vec!["status", "--branch", "--porcelain=2"];
    if options.stash {
        args.push("--show-stash");
    }
    if !options.untracked {
        args.push("--untracked-files=no");
    }
    if !options.include_nested {
        args.push("--ignore-submodules=all");
    }
    args
}

/// Status of one repository as far as it was requested
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusFields {
    pub ahead: u32,
    pub behind: u32,
    pub status_class: Option<SyncStatus>,
    pub dirty: Option<bool>,
    pub untracked: Option<bool>,
    pub stash: Option<bool>,
    pub branch_head: Option<String>,
    pub branch_upstream: Option<String>,
}

impl StatusFields {
    /// Applies the extraction rules selected by `options` to porcelain text
    pub fn from_porcelain(porcelain: &str, options: &StatusOptions) -> Result<Self> {
        let mut fields = StatusFields::default();

        if let Some((ahead, behind)) = parse_ahead_behind(porcelain)? {
            fields.ahead = ahead;
            fields.behind = behind;
            fields.status_class = Some(classify(ahead, behind));
        }

        if options.dirty {
            fields.dirty = Some(has_tracked_changes(porcelain));
        }
        if options.untracked {
            fields.untracked = Some(has_untracked(porcelain));
        }
        if options.stash {
            fields.stash = Some(has_stash(porcelain));
        }
        if options.branch_head {
            fields.branch_head = parse_branch_head(porcelain);
        }
        if options.branch_upstream {
            fields.branch_upstream = parse_branch_upstream(porcelain);
        }

        Ok(fields)
    }
}

/// Runs `git status` in `path` and extracts the requested fields
pub fn extract_status<R: Runner + ?Sized>(
    runner: &R,
    path: &Path,
    options: &StatusOptions,
) -> Result<StatusFields> {
    let args = status_args(options);
    let porcelain = runner.git(&args, path)?;
    StatusFields::from_porcelain(&porcelain, options).map_err(|e| match e {
        Error::Parse { message, .. } => Error::Parse {
            command: format!("{} (in {})", command_line("git", &args), path.display()),
            message,
        },
        other => other,
    })
}
