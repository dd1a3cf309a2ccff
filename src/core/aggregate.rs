//! Record aggregation
//!
//! Drives discovery, naming and per-repository extraction and collects the
//! results into one ordered record set for the renderers.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::config::{SortOrder, StatusConfig};
use super::discovery::{dedup_repositories, find_repositories};
use super::naming::{name_repositories, RepositoryNames};
use crate::git::{
    extract_status, fetch_needed, last_commit_epoch, last_commit_time, origin_url, Runner,
    SyncStatus,
};

/// Everything known about one repository
///
/// Optional fields are `None` when their query was not requested or the data
/// does not exist (no upstream, no origin remote). `None` never means "false".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub top_level_path: PathBuf,
    pub short_name: String,
    pub unique_name: String,
    pub top_level_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_head: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_upstream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_epoch: Option<i64>,
    pub ahead: u32,
    pub behind: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_class: Option<SyncStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub untracked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_needed: Option<bool>,
}

/// Finds every repository under `root` and queries it as `config` asks
///
/// Extraction runs on `jobs` worker threads (1 keeps it strictly
/// sequential). Records come back sorted by the configured order; the first
/// failing repository aborts the whole run.
pub fn collect_records<R: Runner + ?Sized>(
    runner: &R,
    root: &Path,
    config: &StatusConfig,
    jobs: usize,
) -> Result<Vec<RepositoryRecord>> {
    let found = find_repositories(runner, root, config.include_nested)
        .with_context(|| format!("Failed to search {} for repositories", root.display()))?;
    let paths = dedup_repositories(found);
    let names = name_repositories(&paths);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("Failed to start worker threads")?;

    let mut records = pool.install(|| {
        paths
            .par_iter()
            .zip(names.into_par_iter())
            .map(|(path, names)| {
                build_record(runner, path, names, config)
                    .with_context(|| format!("Failed to query repository {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    sort_records(&mut records, config.sort_order);
    Ok(records)
}

/// Runs the status extractor and the requested auxiliary queries for one repository
pub fn build_record<R: Runner + ?Sized>(
    runner: &R,
    path: &Path,
    names: RepositoryNames,
    config: &StatusConfig,
) -> crate::error::Result<RepositoryRecord> {
    let status = extract_status(runner, path, &config.status_options())?;

    let fetch_needed = match (&status.branch_head, &status.branch_upstream) {
        (Some(head), Some(upstream)) if config.show_fetch_needed => {
            Some(fetch_needed(runner, path, head, upstream)?)
        }
        _ => None,
    };

    let origin_url = match status.branch_upstream {
        Some(_) if config.show_url => origin_url(runner, path)?,
        _ => None,
    };

    let last_commit_time = if config.show_commit_time {
        Some(last_commit_time(runner, path, config.commit_time_style())?)
    } else {
        None
    };

    let last_commit_epoch = if config.sort_order == SortOrder::Time {
        Some(last_commit_epoch(runner, path)?)
    } else {
        None
    };

    Ok(RepositoryRecord {
        top_level_path: path.to_path_buf(),
        short_name: names.short_name,
        unique_name: names.unique_name,
        top_level_group: names.top_level_group,
        origin_url,
        branch_head: status.branch_head.filter(|_| config.show_branch_head),
        branch_upstream: status.branch_upstream.filter(|_| config.show_branch_upstream),
        last_commit_time,
        last_commit_epoch,
        ahead: status.ahead,
        behind: status.behind,
        status_class: status.status_class,
        dirty: status.dirty,
        untracked: status.untracked,
        stash: status.stash,
        fetch_needed,
    })
}

/// Orders records in place; ties keep their current order
///
/// By time, the most recent commit comes first and records without an epoch
/// go last.
pub fn sort_records(records: &mut [RepositoryRecord], order: SortOrder) {
    match order {
        SortOrder::Name => records.par_sort_by(|a, b| a.unique_name.cmp(&b.unique_name)),
        SortOrder::Time => {
            records.par_sort_by(|a, b| b.last_commit_epoch.cmp(&a.last_commit_epoch))
        }
    }
}
