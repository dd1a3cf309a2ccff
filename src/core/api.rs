//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - Repository discovery and naming
//! - Record aggregation and sorting
//! - Configuration
//!
//! Internal implementation details are not exposed through this API.

// Discovery and naming
pub use super::discovery::{dedup_repositories, find_repositories};
pub use super::naming::{common_prefix, name_repositories, RepositoryNames};

// Aggregation
pub use super::aggregate::{build_record, collect_records, sort_records, RepositoryRecord};

// Configuration
pub use super::config::{
    default_config_path, get_git_concurrency, EmitFormat, FileConfig, NameShown, SortOrder,
    StatusConfig, StatusFileConfig, TimeFormat, GIT_CONCURRENT_CAP, MAX_LOGGING_LEVEL,
};

// User-facing messages
pub use super::config::{FINDING_MESSAGE, NO_REPOS_MESSAGE, RETRIEVING_MESSAGE};

// Progress
pub use super::progress::SpinnerGuard;

// Terminal utilities (re-exported from utils)
pub use crate::utils::{set_terminal_title, set_terminal_title_and_flush};
