//! Publish and version runners
//!
//! The orchestrator decides *what* happens; runners do it. Both are
//! traits so the dispatch logic tests against fakes, with script-backed
//! implementations (`ScriptPublishRunner`, `ScriptVersionRunner`) doing
//! the real work via `sh -c`.

pub mod publish;
pub mod version;
pub mod workspace;

use crate::core::error::{RunnerError, YardError, YardResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Inputs to a publish run
#[derive(Debug, Clone)]
pub struct PublishRequest {
  /// Command that performs the registry publish
  pub script: String,

  /// Host token forwarded to the script environment
  pub host_token: String,

  /// Create one host release per published tag
  pub create_host_releases: bool,
}

/// A package the publish script reported as newly published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPackage {
  pub name: String,
  pub version: String,
}

/// Result of a publish run
#[derive(Debug, Clone, Default)]
pub struct PublishOutcome {
  pub published: bool,
  pub published_packages: Vec<PublishedPackage>,
}

/// Inputs to a version run
#[derive(Debug, Clone)]
pub struct VersionRequest {
  /// Command that applies pending changesets; None selects the built-in
  /// `npx changeset version`
  pub script: Option<String>,

  /// Title for the version PR
  pub pr_title: String,

  /// Message for the version commit
  pub commit_message: String,

  /// Whether a publish command is configured (changes the PR body copy)
  pub has_publish_script: bool,

  /// Base branch for the PR; None means the currently checked-out branch
  pub branch: Option<String>,
}

/// Result of a version run
#[derive(Debug, Clone, Default)]
pub struct VersionOutcome {
  pub pull_request_number: Option<u64>,
}

/// Publishes packages and reports what went out
pub trait PublishRunner {
  fn run_publish(&self, request: &PublishRequest) -> YardResult<PublishOutcome>;
}

/// Applies pending changesets and maintains the version PR
pub trait VersionRunner {
  fn run_version(&self, request: &VersionRequest) -> YardResult<VersionOutcome>;
}

/// Run a release script via `sh -c`, returning its captured stdout
///
/// The child inherits the environment plus GITHUB_TOKEN, so changelog
/// and publish tooling inside the script can authenticate. Output is
/// echoed inside a collapsible log group so CI logs keep the script's
/// own reporting.
pub(crate) fn run_script(script: &str, cwd: &Path, host_token: &str) -> YardResult<String> {
  crate::ui::group(&format!("$ {}", script), || {
    let output = Command::new("sh")
      .arg("-c")
      .arg(script)
      .current_dir(cwd)
      .env("GITHUB_TOKEN", host_token)
      .output()
      .map_err(|e| {
        YardError::Runner(RunnerError::Spawn {
          script: script.to_string(),
          source: e,
        })
      })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr);
    print!("{}", stdout);
    eprint!("{}", stderr);

    if !output.status.success() {
      return Err(YardError::Runner(RunnerError::ScriptFailed {
        script: script.to_string(),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(stdout)
  })
}
