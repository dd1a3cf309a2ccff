//! # gitas
//!
//! `gitas` finds every git working tree below a directory and reports, per
//! repository, how it stands against its upstream. It powers the `gitas` CLI.
//!
//! ## Core Features
//!
//! - **Discovery**: One walk over the tree; each repository's subtree is
//!   pruned unless nested repositories are requested.
//! - **Status Extraction**: Porcelain v2 output is read by small named rules
//!   into ahead/behind counts, a four-way sync class and dirty, untracked and
//!   stash flags.
//! - **Auxiliary Queries**: Origin URL, last commit time, and whether the
//!   branch needs syncing with its remote.
//! - **Output**: Aligned table, JSON or Markdown.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gitas::core::{collect_records, StatusConfig};
//! use gitas::git::SystemRunner;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = StatusConfig::default();
//!     let records = collect_records(&SystemRunner, Path::new("."), &config, 4)?;
//!     for record in records {
//!         println!("{}: {:?}", record.unique_name, record.status_class);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod git;
pub mod render;
pub mod utils;
