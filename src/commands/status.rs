use serde::Serialize;
use std::env;
use std::path::PathBuf;

use crate::changeset::Changeset;
use crate::changeset::read::read_changesets;
use crate::core::config::{FileConfig, RunConfig, RunOverrides};
use crate::core::error::{ConfigError, YardError, YardResult};
use crate::release::{ReleaseAction, ReleaseState};

/// Status information for one pending changeset
#[derive(Debug, Clone, Serialize)]
pub struct ChangesetStatus {
  /// Changeset id (file stem)
  pub id: String,

  /// First line of the summary
  pub summary: String,

  /// `name (bump)` per released package; empty for empty changesets
  pub releases: Vec<String>,
}

/// Report of what a run would do, without doing any of it
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
  /// Action the next run takes
  pub action: String,

  /// Whether a publish script is configured
  pub has_publish_script: bool,

  /// Pending changesets
  pub changesets: Vec<ChangesetStatus>,
}

/// Run the status command
pub fn run_status(cwd: Option<PathBuf>, json: bool) -> YardResult<()> {
  if let Some(dir) = &cwd {
    env::set_current_dir(dir).map_err(|e| {
      YardError::Config(ConfigError::WorkingDirectory {
        path: dir.clone(),
        reason: e.to_string(),
      })
    })?;
  }
  let current_dir = env::current_dir()?;

  let config = RunConfig::resolve(RunOverrides::default(), FileConfig::load(&current_dir)?);
  let changesets = read_changesets(&current_dir)?;

  let state = ReleaseState::classify(&changesets, config.publish_script.as_deref());
  let action = ReleaseAction::decide(&state);

  let report = StatusReport {
    action: action.as_str().to_string(),
    has_publish_script: state.has_publish_script,
    changesets: changesets.iter().map(changeset_status).collect(),
  };

  if json {
    println!(
      "{}",
      serde_json::to_string_pretty(&report).map_err(|e| YardError::message(format!("Serialization error: {}", e)))?
    );
  } else {
    print_status(&report);
  }

  Ok(())
}

fn changeset_status(changeset: &Changeset) -> ChangesetStatus {
  ChangesetStatus {
    id: changeset.id.clone(),
    summary: changeset.summary.lines().next().unwrap_or("").to_string(),
    releases: changeset
      .releases
      .iter()
      .map(|release| format!("{} ({})", release.name, release.bump.as_str()))
      .collect(),
  }
}

fn print_status(report: &StatusReport) {
  println!("\n🚦 Release Status\n");

  if report.changesets.is_empty() {
    println!("No pending changesets");
  } else {
    println!("{:<24} {:<40} SUMMARY", "CHANGESET", "RELEASES");
    println!("{:-<100}", "");

    for changeset in &report.changesets {
      let releases = if changeset.releases.is_empty() {
        "(empty)".to_string()
      } else {
        changeset.releases.join(", ")
      };
      println!("{:<24} {:<40} {}", changeset.id, releases, changeset.summary);
    }
  }

  println!();
  println!("Next action: {}", report.action);
  println!();
}
