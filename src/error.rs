//! Error type shared by discovery, status extraction and configuration
//!
//! Library functions return [`Result`]; command handlers wrap these errors with
//! `anyhow` context naming the repository and the step that failed.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the core pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The given path is missing or is not a directory
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// The external command could not be started at all
    #[error("failed to run `{command}` in {}: {source}", dir.display())]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external command ran but exited unsuccessfully
    #[error("`{command}` failed in {} ({status}){}", dir.display(), stderr_suffix(stderr))]
    CommandFailed {
        command: String,
        dir: PathBuf,
        status: String,
        stderr: String,
    },

    /// The command output carried an annotation in an unexpected shape
    #[error("unexpected output from `{command}`: {message}")]
    Parse { command: String, message: String },

    /// Directory traversal failed (permissions, vanished entries, ...)
    #[error("walking {} failed: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// The configuration file exists but cannot be read or parsed
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// True when the command started but reported failure through its exit status
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Error::CommandFailed { .. })
    }
}

fn stderr_suffix(stderr: &str) -> String {
    match stderr.lines().next() {
        Some(line) if !line.trim().is_empty() => format!(": {}", line.trim()),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
