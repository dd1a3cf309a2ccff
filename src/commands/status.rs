//! Repository status command implementation
//!
//! Searches PATH for git repositories, queries each one and prints the
//! result as a table, JSON or Markdown.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use crate::core::{
    collect_records, get_git_concurrency, set_terminal_title, set_terminal_title_and_flush,
    EmitFormat, FileConfig, NameShown, RepositoryRecord, SortOrder, SpinnerGuard, StatusConfig,
    TimeFormat, NO_REPOS_MESSAGE, RETRIEVING_MESSAGE,
};
use crate::git::SystemRunner;
use crate::render::{emit_json, emit_markdown, emit_table};
use crate::utils::{show_progress, use_color};

/// Flags of `gitas status`
///
/// Boolean flags take an optional value (`-t=false`); unset flags fall back
/// to the config file and then to the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Directory to search
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Name shown
    #[arg(short, long, value_enum)]
    pub name: Option<NameShown>,

    /// Time of last commit shown [default: true]
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub time: Option<bool>,

    /// Time format
    #[arg(short, long, value_enum)]
    pub format: Option<TimeFormat>,

    /// Branch shown
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub branch: Option<bool>,

    /// Query whether a fetch is needed (implies -b -r)
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub query: Option<bool>,

    /// Remote shown
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub remote: Option<bool>,

    /// URL shown
    #[arg(short = 'l', long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub url: Option<bool>,

    /// Dirty shown [default: true]
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub dirty: Option<bool>,

    /// Untracked shown
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub untracked: Option<bool>,

    /// Stash shown
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub stash: Option<bool>,

    /// Sort order
    #[arg(short, long, value_enum)]
    pub order: Option<SortOrder>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub emit: Option<EmitFormat>,

    /// Also look for repositories nested inside other repositories
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub nested: Option<bool>,

    /// Number of repositories queried at once
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Query one repository at a time
    #[arg(long)]
    pub sequential: bool,
}

impl StatusArgs {
    /// Combines the config file with these flags; flags win
    pub fn to_config(&self, file: &FileConfig) -> (StatusConfig, usize) {
        let mut config = StatusConfig::default();
        config.apply_file(&file.status);

        if let Some(value) = self.name {
            config.name_shown = value;
        }
        if let Some(value) = self.format {
            config.time_format = value;
        }
        if let Some(value) = self.order {
            config.sort_order = value;
        }
        if let Some(value) = self.emit {
            config.emit_format = value;
        }

        let flags = [
            (self.time, &mut config.show_commit_time),
            (self.branch, &mut config.show_branch_head),
            (self.query, &mut config.show_fetch_needed),
            (self.remote, &mut config.show_branch_upstream),
            (self.url, &mut config.show_url),
            (self.dirty, &mut config.show_dirty),
            (self.untracked, &mut config.show_untracked),
            (self.stash, &mut config.show_stash),
            (self.nested, &mut config.include_nested),
        ];
        for (value, target) in flags {
            if let Some(value) = value {
                *target = value;
            }
        }

        let jobs = get_git_concurrency(self.jobs.or(file.jobs), self.sequential);
        (config.resolved(), jobs)
    }
}

/// Collects the records for `root` on a blocking thread while a spinner runs
pub async fn collect_status(
    root: PathBuf,
    config: StatusConfig,
    jobs: usize,
    show_spinner: bool,
) -> Result<Vec<RepositoryRecord>> {
    let spinner = if show_spinner {
        SpinnerGuard::start(RETRIEVING_MESSAGE)?
    } else {
        SpinnerGuard::hidden()
    };

    let records = tokio::task::spawn_blocking(move || {
        collect_records(&SystemRunner, &root, &config, jobs)
    })
    .await
    .context("Repository status worker panicked")??;

    drop(spinner);
    Ok(records)
}

/// Writes `records` in the configured format
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[RepositoryRecord],
    config: &StatusConfig,
    styled: bool,
) -> Result<()> {
    match config.emit_format {
        EmitFormat::Json => emit_json(out, records).context("Emitting JSON failed")?,
        EmitFormat::Markdown => {
            emit_markdown(out, records, config).context("Emitting Markdown failed")?
        }
        EmitFormat::Table => {
            emit_table(out, records, config, styled).context("Emitting table failed")?
        }
    }
    Ok(())
}

/// Handles the repository status command
pub async fn handle_status_command(args: StatusArgs) -> Result<()> {
    let file = FileConfig::discover().context("Failed to load configuration")?;
    let (config, jobs) = args.to_config(&file);
    log::debug!("status of {} with {config:?}, {jobs} jobs", args.path.display());

    let styled = config.emit_format == EmitFormat::Table && use_color();
    if styled {
        set_terminal_title("🚀 gitas status");
    }

    let records =
        collect_status(args.path.clone(), config.clone(), jobs, show_progress()).await;

    if styled {
        set_terminal_title_and_flush("✅ gitas status");
    }
    let records = records?;

    if records.is_empty() && config.emit_format != EmitFormat::Json {
        eprintln!("{NO_REPOS_MESSAGE}");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_records(&mut out, &records, &config, styled)?;
    out.flush()?;
    Ok(())
}
