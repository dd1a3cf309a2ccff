//! Basic git operations and command execution

use regex::Regex;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

const GIT: &str = "git";
const SHELL: &str = "bash";

// Git command arguments
const GIT_INSIDE_WORK_TREE_ARGS: &[&str] = &["rev-parse", "--is-inside-work-tree"];
const GIT_SHOW_TOPLEVEL_ARGS: &[&str] = &["rev-parse", "--show-toplevel"];
const GIT_ORIGIN_URL_ARGS: &[&str] = &["config", "--get", "remote.origin.url"];
const GIT_REMOTE_SHOW_ARGS: &[&str] = &["remote", "show"];

/// Executes an external program in a working directory
///
/// Implementations return the trimmed standard output on success. A program
/// that cannot be started yields [`Error::Spawn`]; one that exits non-zero
/// yields [`Error::CommandFailed`].
pub trait Runner: Sync {
    fn run(&self, program: &str, args: &[&str], dir: &Path) -> Result<String>;

    /// Runs git with the given arguments
    fn git(&self, args: &[&str], dir: &Path) -> Result<String> {
        self.run(GIT, args, dir)
    }
}

/// Runs commands as real child processes
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], dir: &Path) -> Result<String> {
        let command = command_line(program, args);
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                dir: dir.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                dir: dir.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        log::trace!("`{command}` in {}:\n{stdout}", dir.display());
        Ok(stdout)
    }
}

/// Renders a program and its arguments the way they would be typed
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks whether `dir` lies inside a git working tree
///
/// A failing probe (not a repository, inside `.git`, ...) is a plain "no";
/// only a probe that cannot be started is an error.
pub fn is_inside_work_tree<R: Runner + ?Sized>(runner: &R, dir: &Path) -> Result<bool> {
    match runner.git(GIT_INSIDE_WORK_TREE_ARGS, dir) {
        Ok(output) => Ok(output == "true"),
        Err(e) if e.is_command_failure() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Returns the root directory of the working tree containing `dir`
pub fn show_toplevel<R: Runner + ?Sized>(runner: &R, dir: &Path) -> Result<String> {
    runner.git(GIT_SHOW_TOPLEVEL_ARGS, dir)
}

/// Reads the configured URL of the `origin` remote
///
/// `git config --get` exits non-zero when the key is missing, so a
/// repository without an `origin` remote yields `None`.
pub fn origin_url<R: Runner + ?Sized>(runner: &R, dir: &Path) -> Result<Option<String>> {
    match runner.git(GIT_ORIGIN_URL_ARGS, dir) {
        Ok(url) => Ok(Some(url)),
        Err(e) if e.is_command_failure() => Ok(None),
        Err(e) => Err(e),
    }
}

/// How the last commit time is shown to humans
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitTimeStyle {
    /// "3 days ago"
    Relative,
    /// "2024-05-01 12:00:00 +0200"
    Iso,
    /// "2024-05-01T12:00:00+02:00"
    StrictIso,
}

impl CommitTimeStyle {
    fn placeholder(self) -> &'static str {
        match self {
            CommitTimeStyle::Relative => "%cr",
            CommitTimeStyle::Iso => "%ci",
            CommitTimeStyle::StrictIso => "%cI",
        }
    }
}

fn log_args(placeholder: &str) -> Vec<String> {
    vec![
        "log".to_string(),
        format!("--pretty=format:{placeholder}"),
        "--date-order".to_string(),
        "-n".to_string(),
        "1".to_string(),
    ]
}

/// Reads the committer date of the most recent commit, formatted for display
pub fn last_commit_time<R: Runner + ?Sized>(
    runner: &R,
    dir: &Path,
    style: CommitTimeStyle,
) -> Result<String> {
    let args = log_args(style.placeholder());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    runner.git(&args, dir)
}

/// Reads the committer date of the most recent commit as UNIX seconds
pub fn last_commit_epoch<R: Runner + ?Sized>(runner: &R, dir: &Path) -> Result<i64> {
    let args = log_args("%ct");
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let output = runner.git(&args, dir)?;
    output.parse::<i64>().map_err(|e| Error::Parse {
        command: command_line(GIT, &args),
        message: format!("commit epoch {output:?} is not a number: {e}"),
    })
}

/// Extracts the remote name from an upstream such as `origin/main`
pub fn remote_of_upstream(upstream: &str) -> &str {
    upstream.split('/').next().unwrap_or(upstream)
}

/// Checks the remote description for "`<head>` pushes to ... (up to date)"
///
/// Anything else, including output in an unfamiliar shape, reads as "needs sync".
pub fn push_target_is_up_to_date(remote_show: &str, head: &str) -> bool {
    let pattern = format!(
        r"(?m)^\s*{}\s+pushes to\s+\S+\s+\(up to date\)\s*$",
        regex::escape(head)
    );
    match Regex::new(&pattern) {
        Ok(regex) => regex.is_match(remote_show),
        Err(_) => false,
    }
}

/// Decides whether the branch needs to be synchronized with its remote
pub fn fetch_needed<R: Runner + ?Sized>(
    runner: &R,
    dir: &Path,
    head: &str,
    upstream: &str,
) -> Result<bool> {
    let mut args = Vec::from(GIT_REMOTE_SHOW_ARGS);
    args.push(remote_of_upstream(upstream));
    let output = runner.git(&args, dir)?;
    Ok(!push_target_is_up_to_date(&output, head))
}

/// Runs an arbitrary shell command in `dir`, streaming its output to the terminal
/// Returns whether the command exited successfully
pub async fn run_shell(dir: &Path, shell_command: &str) -> std::io::Result<bool> {
    let status = tokio::process::Command::new(SHELL)
        .arg("-c")
        .arg(shell_command)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await?;
    Ok(status.success())
}
