//! Git testing utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// Runs git in `path`, failing with its stderr when it exits non-zero
pub fn git(path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(path).output()?;

    if !output.status.success() {
        anyhow::bail!(
            "git {} failed in {}: {}",
            args.join(" "),
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn configure_user(path: &Path) -> Result<()> {
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;
    // Disable commit signing for tests
    git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Sets up a git repository with user config on branch `main`
pub fn setup_git_repo(path: &Path) -> Result<()> {
    let init_result = Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(path)
        .output()?;

    if !init_result.status.success() {
        anyhow::bail!("Git not available - skipping test");
    }

    // Independent of init.defaultBranch
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    configure_user(path)
}

/// Creates a bare repository to act as a remote
pub fn setup_bare_remote(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    git(path, &["init", "--bare", "--quiet"])?;
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    Ok(())
}

/// Clones `remote` into `dest` and configures the user
pub fn clone_repo(remote: &Path, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or(dest);
    std::fs::create_dir_all(parent)?;
    let remote = remote.to_string_lossy();
    let dest_str = dest.to_string_lossy();
    git(parent, &["clone", "--quiet", &remote, &dest_str])?;
    configure_user(dest)
}

/// Creates a test commit in the repository
pub fn create_test_commit(
    path: &Path,
    file_name: &str,
    content: &str,
    message: &str,
) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;
    git(path, &["add", file_name])?;
    git(path, &["commit", "--quiet", "-m", message])?;
    Ok(())
}

/// Creates a commit whose author and committer date is `epoch` (UNIX seconds)
pub fn create_commit_at(path: &Path, file_name: &str, epoch: i64) -> Result<()> {
    std::fs::write(path.join(file_name), epoch.to_string())?;
    git(path, &["add", file_name])?;

    let date = format!("@{epoch} +0000");
    let output = Command::new("git")
        .args(["commit", "--quiet", "-m", file_name])
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .current_dir(path)
        .output()?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to create commit: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}

/// Creates multiple test repositories in a parent directory
pub fn create_multiple_repos(parent_dir: &Path, count: usize) -> Result<Vec<String>> {
    let mut repo_names = Vec::new();

    for i in 0..count {
        let repo_name = format!("test-repo-{}", i + 1);
        let repo_path = parent_dir.join(&repo_name);
        std::fs::create_dir(&repo_path)?;

        setup_git_repo(&repo_path)?;
        create_test_commit(
            &repo_path,
            "README.md",
            &format!("# Repo {}", i + 1),
            "Initial commit",
        )?;

        repo_names.push(repo_name);
    }

    Ok(repo_names)
}

/// Adds a git remote to a repository
pub fn add_git_remote(path: &Path, remote_name: &str, url: &str) -> Result<()> {
    git(path, &["remote", "add", remote_name, url])?;
    Ok(())
}

/// Pushes `main` to `origin` and sets it as upstream
pub fn push_upstream(path: &Path) -> Result<()> {
    git(path, &["push", "--quiet", "-u", "origin", "main"])?;
    Ok(())
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
