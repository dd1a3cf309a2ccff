//! Configuration constants and settings
//!
//! `StatusConfig` is the one value that decides what gets queried and how it
//! is shown. It starts from defaults, is overlaid with the optional config
//! file, and finally with command-line flags, then is passed explicitly to
//! every stage.

use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::git::{CommitTimeStyle, StatusOptions};

// Default concurrency cap; git status is cheap but each call still forks
pub const GIT_CONCURRENT_CAP: usize = 12;

// Spinner refresh period
pub const SPINNER_TICK_MS: u64 = 120;
pub const SPINNER_TEMPLATE: &str = "{spinner} {msg}";

// UI Constants
pub const FINDING_MESSAGE: &str = "Finding repositories";
pub const RETRIEVING_MESSAGE: &str = "Retrieving status of repositories";
pub const NO_REPOS_MESSAGE: &str = "No git repositories found.";

// Logging
pub const MAX_LOGGING_LEVEL: u8 = 3;

// Configuration file lookup
pub const CONFIG_ENV_VAR: &str = "GITAS_CONFIG";
pub const CONFIG_DIR_NAME: &str = "gitas";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Determines the worker count for status extraction
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --jobs N flag (or `jobs` in the config file) → N
/// 3. Smart default → min(CPU_CORES + 2, 12)
pub fn get_git_concurrency(jobs: Option<usize>, sequential: bool) -> usize {
    if sequential {
        return 1;
    }

    if let Some(n) = jobs {
        return n.max(1);
    }

    (num_cpus::get() + 2).min(GIT_CONCURRENT_CAP)
}

/// Which name identifies a repository in the output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameShown {
    /// Shortest path that is still unique among the found repositories
    #[default]
    #[value(alias = "u")]
    Unique,
    /// Full top-level path
    #[value(alias = "p")]
    Path,
    /// Last path segment only
    #[value(alias = "s")]
    Short,
}

/// Order of the emitted repositories
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent commit first
    #[default]
    #[value(alias = "t")]
    Time,
    /// Alphabetical by unique name
    #[value(alias = "n")]
    Name,
}

/// Format of the last commit time column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    #[default]
    #[value(alias = "r")]
    Relative,
    #[value(alias = "i")]
    Iso,
}

/// Output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    #[default]
    #[value(alias = "t")]
    Table,
    #[value(alias = "j")]
    Json,
    #[value(alias = "m")]
    Markdown,
}

/// Everything the status pipeline and the renderers need to know
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusConfig {
    pub name_shown: NameShown,
    pub sort_order: SortOrder,
    pub time_format: TimeFormat,
    pub emit_format: EmitFormat,
    pub show_url: bool,
    pub show_commit_time: bool,
    pub show_branch_head: bool,
    pub show_fetch_needed: bool,
    pub show_branch_upstream: bool,
    pub show_dirty: bool,
    pub show_untracked: bool,
    pub show_stash: bool,
    pub include_nested: bool,
    /// Strict ISO timestamps; set by JSON output
    pub strict_iso_time: bool,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            name_shown: NameShown::Unique,
            sort_order: SortOrder::Time,
            time_format: TimeFormat::Relative,
            emit_format: EmitFormat::Table,
            show_url: false,
            show_commit_time: true,
            show_branch_head: false,
            show_fetch_needed: false,
            show_branch_upstream: false,
            show_dirty: true,
            show_untracked: false,
            show_stash: false,
            include_nested: false,
            strict_iso_time: false,
        }
    }
}

impl StatusConfig {
    /// Applies the rules that tie flags together
    ///
    /// Querying fetch need shows the branch it is about; JSON output carries
    /// every field.
    pub fn resolved(mut self) -> Self {
        if self.show_fetch_needed {
            self.show_branch_head = true;
            self.show_branch_upstream = true;
        }

        if self.emit_format == EmitFormat::Json {
            self.show_url = true;
            self.show_commit_time = true;
            self.show_branch_head = true;
            self.show_branch_upstream = true;
            self.show_dirty = true;
            self.show_untracked = true;
            self.show_stash = true;
            self.show_fetch_needed = true;
            self.strict_iso_time = true;
        }

        self
    }

    /// The subset of settings the status extractor needs
    pub fn status_options(&self) -> StatusOptions {
        StatusOptions {
            dirty: self.show_dirty,
            untracked: self.show_untracked,
            stash: self.show_stash,
            branch_head: self.show_branch_head || self.show_fetch_needed,
            branch_upstream: self.show_branch_upstream
                || self.show_url
                || self.show_fetch_needed,
            include_nested: self.include_nested,
        }
    }

    /// How commit times are formatted for display
    pub fn commit_time_style(&self) -> CommitTimeStyle {
        if self.strict_iso_time {
            return CommitTimeStyle::StrictIso;
        }
        match self.time_format {
            TimeFormat::Relative => CommitTimeStyle::Relative,
            TimeFormat::Iso => CommitTimeStyle::Iso,
        }
    }

    /// Overlays values present in the config file
    pub fn apply_file(&mut self, file: &StatusFileConfig) {
        if let Some(value) = file.name {
            self.name_shown = value;
        }
        if let Some(value) = file.order {
            self.sort_order = value;
        }
        if let Some(value) = file.format {
            self.time_format = value;
        }
        if let Some(value) = file.emit {
            self.emit_format = value;
        }

        let flags = [
            (file.url, &mut self.show_url),
            (file.time, &mut self.show_commit_time),
            (file.branch, &mut self.show_branch_head),
            (file.query, &mut self.show_fetch_needed),
            (file.remote, &mut self.show_branch_upstream),
            (file.dirty, &mut self.show_dirty),
            (file.untracked, &mut self.show_untracked),
            (file.stash, &mut self.show_stash),
            (file.nested, &mut self.include_nested),
        ];
        for (value, target) in flags {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

/// Contents of the configuration file
///
/// ```toml
/// jobs = 4
///
/// [status]
/// name = "short"
/// order = "name"
/// branch = true
/// untracked = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub jobs: Option<usize>,
    #[serde(default)]
    pub status: StatusFileConfig,
}

/// `[status]` table; keys mirror the long command-line flags
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusFileConfig {
    pub name: Option<NameShown>,
    pub order: Option<SortOrder>,
    pub format: Option<TimeFormat>,
    pub emit: Option<EmitFormat>,
    pub url: Option<bool>,
    pub time: Option<bool>,
    pub branch: Option<bool>,
    pub query: Option<bool>,
    pub remote: Option<bool>,
    pub dirty: Option<bool>,
    pub untracked: Option<bool>,
    pub stash: Option<bool>,
    pub nested: Option<bool>,
}

impl FileConfig {
    /// Parses configuration text; `origin` names the source in errors
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reads the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Loads the default configuration file if there is one
    ///
    /// `GITAS_CONFIG` names the file explicitly and must exist; otherwise
    /// `<config dir>/gitas/config.toml` is used when present.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("loading configuration from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/gitas/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
