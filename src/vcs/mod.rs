//! Git operations via system git (zero dependencies)
//!
//! Every mutation railyard performs on the repository goes through one
//! wrapper around the `git` binary with an isolated environment, so the
//! runner's global git config cannot change behavior under us.

use crate::core::error::{GitError, ResultExt, YardError, YardResult};
use crate::credentials::netrc::BOT_LOGIN;
use std::path::{Path, PathBuf};
use std::process::Command;

const BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// Git backend using system git
#[derive(Debug)]
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> YardResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(YardError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(YardError::message(format!("Failed to open git repository: {}", stderr)));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Get HEAD commit SHA
  pub fn head_sha(&self) -> YardResult<String> {
    self.run(&["rev-parse", "HEAD"])
  }

  /// Get current branch name ("HEAD" when detached)
  pub fn current_branch(&self) -> YardResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Set the bot identity in the repository config
  pub fn setup_user(&self) -> YardResult<()> {
    self.run(&["config", "user.name", BOT_LOGIN])?;
    self.run(&["config", "user.email", BOT_EMAIL])?;
    Ok(())
  }

  /// Check out `branch`, creating it when it does not exist yet
  pub fn switch_to_maybe_existing_branch(&self, branch: &str) -> YardResult<()> {
    if self.run(&["checkout", branch]).is_ok() {
      return Ok(());
    }
    self.run(&["checkout", "-b", branch])?;
    Ok(())
  }

  /// Hard-reset the working tree to `target`
  pub fn reset_hard(&self, target: &str) -> YardResult<()> {
    self.run(&["reset", "--hard", target])?;
    Ok(())
  }

  /// Stage everything and commit with `message`
  pub fn commit_all(&self, message: &str) -> YardResult<()> {
    self.run(&["add", "."])?;
    self.run(&["commit", "-m", message])?;
    Ok(())
  }

  /// True when the working tree has no pending changes
  pub fn is_clean(&self) -> YardResult<bool> {
    let stdout = self.run(&["status", "--porcelain"])?;
    Ok(stdout.is_empty())
  }

  /// Push HEAD to `branch` on origin
  pub fn push_branch(&self, branch: &str, force: bool) -> YardResult<()> {
    let refspec = format!("HEAD:refs/heads/{}", branch);
    if force {
      self.run(&["push", "origin", &refspec, "--force"])?;
    } else {
      self.run(&["push", "origin", &refspec])?;
    }
    Ok(())
  }

  /// Push all local tags to origin
  pub fn push_tags(&self) -> YardResult<()> {
    self.run(&["push", "origin", "--tags"])?;
    Ok(())
  }

  /// Run a git command, trimming stdout; non-zero exit carries stderr
  fn run(&self, args: &[&str]) -> YardResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      return Err(YardError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}
