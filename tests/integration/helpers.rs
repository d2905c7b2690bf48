//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A repository fixture: work checkout, bare origin, fake home
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
  pub home: PathBuf,
  pub origin: PathBuf,
  pub outputs: PathBuf,
}

impl TestRepo {
  /// One package at the root, one initial commit, `main` checked out
  /// and pushed to the bare origin
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("work");
    let home = root.path().join("home");
    let origin = root.path().join("origin.git");
    let outputs = root.path().join("outputs.txt");

    fs::create_dir_all(&path)?;
    fs::create_dir_all(&home)?;
    fs::create_dir_all(&origin)?;

    git(&origin, &["init", "--bare", "--quiet", "."])?;
    git(&path, &["init", "--quiet", "--initial-branch=main", "."])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    let repo = Self {
      _root: root,
      path,
      home,
      origin,
      outputs,
    };

    repo.write_package("pkg-a", "1.0.0")?;
    fs::create_dir_all(repo.path.join(".changeset"))?;
    fs::write(repo.path.join(".changeset/README.md"), "# Changesets\n")?;
    fs::write(repo.path.join(".changeset/config.json"), "{}\n")?;
    repo.commit("initial")?;

    let origin_path = repo.origin.display().to_string();
    git(&repo.path, &["remote", "add", "origin", &origin_path])?;
    // Tag pushes need a ref in common with origin even when the tag set
    // is empty.
    git(&repo.path, &["push", "--quiet", "origin", "main"])?;

    Ok(repo)
  }

  /// Write the root package manifest
  pub fn write_package(&self, name: &str, version: &str) -> Result<()> {
    fs::write(
      self.path.join("package.json"),
      format!("{{\n  \"name\": \"{}\",\n  \"version\": \"{}\"\n}}\n", name, version),
    )?;
    Ok(())
  }

  /// Write a changeset file with raw content
  pub fn write_changeset(&self, id: &str, content: &str) -> Result<()> {
    fs::write(self.path.join(".changeset").join(format!("{}.md", id)), content)?;
    Ok(())
  }

  pub fn commit(&self, message: &str) -> Result<()> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "--quiet", "-m", message])?;
    Ok(())
  }

  /// Contents of the run's output file
  pub fn read_outputs(&self) -> Result<String> {
    fs::read_to_string(&self.outputs).context("Outputs file was not written")
  }

  /// Whether a branch exists on the bare origin
  pub fn origin_has_branch(&self, branch: &str) -> bool {
    Command::new("git")
      .current_dir(&self.origin)
      .args(["rev-parse", "--verify", &format!("refs/heads/{}", branch)])
      .output()
      .map(|o| o.status.success())
      .unwrap_or(false)
  }

  /// Subject of the tip commit of an origin branch
  pub fn origin_tip_subject(&self, branch: &str) -> Result<String> {
    let output = git(&self.origin, &["log", "-1", "--format=%s", branch])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Run a git command, failing the test on a non-zero exit
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the railyard binary in the fixture with a scrubbed environment.
/// Callers assert on the exit status themselves.
pub fn run_railyard(repo: &TestRepo, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  run_railyard_in(repo, &repo.path, args, env)
}

/// Same as [`run_railyard`] but started from an arbitrary directory
pub fn run_railyard_in(repo: &TestRepo, cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_railyard");

  let mut cmd = Command::new(bin);
  cmd
    .current_dir(cwd)
    .env_remove("GITHUB_ACTIONS")
    .env_remove("GITHUB_API_URL")
    .env_remove("GITHUB_REPOSITORY")
    .env_remove("GITHUB_TOKEN")
    .env_remove("NPM_TOKEN")
    .env("HOME", &repo.home)
    .env("GITHUB_OUTPUT", &repo.outputs)
    .args(args);

  for (key, value) in env {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run railyard")
}

/// stdout and stderr combined, for assertion failure messages
pub fn describe(output: &Output) -> String {
  format!(
    "exit: {:?}\nstdout:\n{}\nstderr:\n{}",
    output.status.code(),
    String::from_utf8_lossy(&output.stdout),
    String::from_utf8_lossy(&output.stderr)
  )
}
