//! Release orchestration
//!
//! Classifies the run, writes the default outputs, then executes the
//! single decided action. Default outputs go out before dispatch so
//! every exit path (including skips) reports `published`,
//! `publishedPackages` and `hasChangesets`.

use crate::changeset::Changeset;
use crate::core::config::RunConfig;
use crate::core::error::{YardError, YardResult};
use crate::core::outputs::Outputs;
use crate::credentials::npmrc;
use crate::release::decision::{ReleaseAction, ReleaseState};
use crate::runner::{PublishRequest, PublishRunner, VersionRequest, VersionRunner};
use crate::ui;
use std::path::Path;

pub struct Orchestrator<'a> {
  config: &'a RunConfig,
  home: &'a Path,
  host_token: &'a str,
  npm_token: Option<&'a str>,
  publish: &'a dyn PublishRunner,
  version: &'a dyn VersionRunner,
}

impl<'a> Orchestrator<'a> {
  pub fn new(
    config: &'a RunConfig,
    home: &'a Path,
    host_token: &'a str,
    npm_token: Option<&'a str>,
    publish: &'a dyn PublishRunner,
    version: &'a dyn VersionRunner,
  ) -> Self {
    Self {
      config,
      home,
      host_token,
      npm_token,
      publish,
      version,
    }
  }

  /// Decide and execute the action for this run
  pub fn execute(&self, changesets: &[Changeset], outputs: &Outputs) -> YardResult<ReleaseAction> {
    let state = ReleaseState::classify(changesets, self.config.publish_script.as_deref());
    let action = ReleaseAction::decide(&state);

    outputs.set_bool("published", false)?;
    outputs.set("publishedPackages", "[]")?;
    outputs.set_bool("hasChangesets", state.has_changesets)?;

    match action {
      ReleaseAction::Skip => {
        ui::info("No changesets found");
      }
      ReleaseAction::PublishOnly => {
        ui::info("No changesets found, attempting to publish any unpublished packages to the registry");
        let Some(script) = self.config.publish_script.as_deref() else {
          return Err(YardError::with_help(
            "A publish run was selected without a publish script",
            "Pass --publish-script or set `publish` in railyard.toml.",
          ));
        };
        npmrc::reconcile(self.home, &self.config.registry_url, self.npm_token)?;
        let outcome = self.publish.run_publish(&PublishRequest {
          script: script.to_string(),
          host_token: self.host_token.to_string(),
          create_host_releases: self.config.create_host_releases,
        })?;
        if outcome.published {
          outputs.set_bool("published", true)?;
          outputs.set_json("publishedPackages", &outcome.published_packages)?;
        }
      }
      ReleaseAction::SkipEmptyChangesets => {
        ui::info("All changesets are empty; not creating a pull request");
      }
      ReleaseAction::OpenVersionPR => {
        let outcome = self.version.run_version(&VersionRequest {
          script: self.config.version_script.clone(),
          pr_title: self.config.pr_title.clone(),
          commit_message: self.config.commit_message.clone(),
          has_publish_script: state.has_publish_script,
          branch: self.config.base_branch.clone(),
        })?;
        if let Some(number) = outcome.pull_request_number {
          outputs.set("pullRequestNumber", &number.to_string())?;
        }
      }
    }

    Ok(action)
  }
}
