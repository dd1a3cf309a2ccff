//! Runs one shell command in every repository found under PATH

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::core::{
    dedup_repositories, find_repositories, name_repositories, SpinnerGuard, FINDING_MESSAGE,
    NO_REPOS_MESSAGE,
};
use crate::git::{run_shell, SystemRunner};
use crate::utils::{show_progress, use_color};

/// Arguments of `gitas shell [PATH] "command"`
#[derive(Args, Debug, Clone)]
pub struct ShellArgs {
    /// Optional directory to search, followed by the command passed to `bash -c`
    #[arg(num_args = 1..=2, required = true, value_names = ["PATH", "COMMAND"])]
    pub args: Vec<String>,

    /// Also run in repositories nested inside other repositories
    #[arg(long)]
    pub nested: bool,
}

impl ShellArgs {
    /// Splits the positionals into search root and command
    pub fn root_and_command(&self) -> Result<(PathBuf, &str)> {
        match self.args.as_slice() {
            [command] => Ok((PathBuf::from("."), command.as_str())),
            [path, command] => Ok((PathBuf::from(path), command.as_str())),
            _ => bail!("expected [PATH] \"command\""),
        }
    }
}

/// Finds repositories under `root` on a blocking thread
pub async fn find_shell_targets(root: PathBuf, nested: bool) -> Result<Vec<PathBuf>> {
    let _spinner = if show_progress() {
        SpinnerGuard::start(FINDING_MESSAGE)?
    } else {
        SpinnerGuard::hidden()
    };

    let found = tokio::task::spawn_blocking(move || {
        find_repositories(&SystemRunner, &root, nested)
            .with_context(|| format!("Failed to search {} for repositories", root.display()))
    })
    .await
    .context("Repository search worker panicked")??;

    Ok(dedup_repositories(found))
}

/// Runs `command` in one repository; a failure is reported, not returned
///
/// Returns whether the command succeeded.
pub async fn run_in_repository(repo: &Path, command: &str) -> bool {
    log::info!("running bash -c {command:?} in {}", repo.display());
    match run_shell(repo, command).await {
        Ok(true) => true,
        Ok(false) => {
            log::warn!("`{command}` failed in {}", repo.display());
            false
        }
        Err(e) => {
            log::warn!("could not run `{command}` in {}: {e}", repo.display());
            false
        }
    }
}

fn print_header(path: &Path, name: &str) {
    if use_color() {
        println!("{}", console::style(name).yellow().bright().bold());
    } else {
        println!("{} ({})", name, path.display());
    }
}

/// Handles the shell command
pub async fn handle_shell_command(args: ShellArgs) -> Result<()> {
    let (root, command) = args.root_and_command()?;
    let repos = find_shell_targets(root, args.nested).await?;
    log::info!("{} repos found", repos.len());

    if repos.is_empty() {
        eprintln!("{NO_REPOS_MESSAGE}");
        return Ok(());
    }

    let names = name_repositories(&repos);
    let mut failures = 0;
    for (repo, names) in repos.iter().zip(&names) {
        print_header(repo, &names.unique_name);
        if !run_in_repository(repo, command).await {
            failures += 1;
        }
    }

    if failures > 0 {
        log::warn!("command failed in {failures} of {} repositories", repos.len());
    }
    Ok(())
}
