//! Test fixtures and builders

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::git::{add_git_remote, create_test_commit, git, push_upstream, setup_git_repo};

/// A test repository; cleaned up with its temporary directory when owned
pub struct TestRepo {
    pub root: PathBuf,
    pub name: String,
    _temp_dir: Option<TempDir>,
}

impl TestRepo {
    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create a new file in the repository
    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    /// Commit a new file
    pub fn commit(&self, file_name: &str, message: &str) -> Result<()> {
        create_test_commit(self.path(), file_name, message, message)
    }

    /// Stash a modification of README.md
    pub fn stash_change(&self) -> Result<()> {
        self.create_file("README.md", "# Stashed edit")?;
        git(self.path(), &["stash", "--quiet"])?;
        Ok(())
    }

    /// Commit all changes in the repository
    pub fn commit_all(&self, message: &str) -> Result<()> {
        git(self.path(), &["add", "."])?;
        git(self.path(), &["commit", "--quiet", "-m", message])?;
        Ok(())
    }
}

/// Builder for creating test repositories
pub struct TestRepoBuilder {
    name: String,
    with_remote: Option<String>,
    push: bool,
    with_commits: usize,
}

impl TestRepoBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            with_remote: None,
            push: false,
            with_commits: 1,
        }
    }

    /// Adds `origin` without contacting it
    pub fn with_origin(mut self, url: impl Into<String>) -> Self {
        self.with_remote = Some(url.into());
        self
    }

    /// Adds `origin` and pushes `main` to it, tracking it as upstream
    pub fn with_pushed_origin(mut self, url: impl Into<String>) -> Self {
        self.with_remote = Some(url.into());
        self.push = true;
        self
    }

    pub fn with_commits(mut self, count: usize) -> Self {
        self.with_commits = count;
        self
    }

    /// Builds the repository in its own temporary directory
    pub fn build(self) -> Result<TestRepo> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        let mut repo = self.build_at(&root)?;
        repo._temp_dir = Some(temp_dir);
        Ok(repo)
    }

    /// Builds the repository at `dir`, creating it if needed
    pub fn build_at(self, dir: &Path) -> Result<TestRepo> {
        std::fs::create_dir_all(dir)?;
        setup_git_repo(dir)?;

        // Create initial commit
        create_test_commit(dir, "README.md", "# Test Repo", "Initial commit")?;

        // Create additional commits if specified
        for i in 2..=self.with_commits {
            create_test_commit(
                dir,
                &format!("file{}.txt", i),
                &format!("Content {}", i),
                &format!("Commit {}", i),
            )?;
        }

        if let Some(remote_url) = &self.with_remote {
            add_git_remote(dir, "origin", remote_url)?;
            if self.push {
                push_upstream(dir)?;
            }
        }

        Ok(TestRepo {
            root: dir.to_path_buf(),
            name: self.name,
            _temp_dir: None,
        })
    }
}

/// A temporary search root, canonicalized so it compares equal to what
/// `git rev-parse --show-toplevel` reports
pub struct SearchRoot {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl SearchRoot {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }
}
