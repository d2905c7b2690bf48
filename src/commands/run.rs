//! `railyard run` - execute the release decision for this checkout
//!
//! Requires `GITHUB_TOKEN`. The command fails on the missing token
//! before touching the working tree, credentials, or the host API.
//! Re-running on the same commit is safe: the version branch is rebuilt
//! in place and credential files are reconciled, not duplicated.

use crate::changeset::read::read_changesets;
use crate::core::config::{EnvInputs, FileConfig, RunConfig, RunOverrides};
use crate::core::error::{ConfigError, YardError, YardResult};
use crate::core::outputs::Outputs;
use crate::credentials::netrc;
use crate::host::GitHubClient;
use crate::release::Orchestrator;
use crate::runner::publish::ScriptPublishRunner;
use crate::runner::version::ScriptVersionRunner;
use crate::vcs::SystemGit;
use std::env;
use std::path::PathBuf;

/// Run the release command
pub fn run_release(cwd: Option<PathBuf>, overrides: RunOverrides) -> YardResult<()> {
  let envs = EnvInputs::from_env();
  let host_token = envs.require_github_token()?.to_string();

  if let Some(dir) = &cwd {
    env::set_current_dir(dir).map_err(|e| {
      YardError::Config(ConfigError::WorkingDirectory {
        path: dir.clone(),
        reason: e.to_string(),
      })
    })?;
  }
  let current_dir = env::current_dir()?;

  let config = RunConfig::resolve(overrides, FileConfig::load(&current_dir)?);
  let home = envs.require_home()?.to_path_buf();

  let git = SystemGit::open(&current_dir)?;
  if config.setup_git_user {
    git.setup_user()?;
  }

  // The host token must be available to git over HTTPS before any
  // fetch or push happens.
  netrc::write(&home, &host_token)?;

  let changesets = read_changesets(&current_dir)?;
  let outputs = Outputs::from_env();

  let host = GitHubClient::from_env(&host_token);
  let publish = ScriptPublishRunner::new(&git, &host, &current_dir);
  let version = ScriptVersionRunner::new(&git, &host, &current_dir, &host_token);

  let orchestrator = Orchestrator::new(
    &config,
    &home,
    &host_token,
    envs.npm_token.as_deref(),
    &publish,
    &version,
  );
  orchestrator.execute(&changesets, &outputs)?;

  Ok(())
}
