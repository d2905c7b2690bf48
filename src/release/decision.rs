//! Pure release decision
//!
//! Classification and decision are separated from execution so the
//! whole decision table is testable without touching git, the registry,
//! or the host API.

use crate::changeset::Changeset;

/// Observed facts the release decision is made from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseState {
  /// At least one changeset file is pending
  pub has_changesets: bool,

  /// At least one pending changeset releases a package
  pub has_non_empty_changesets: bool,

  /// A publish script is configured
  pub has_publish_script: bool,
}

impl ReleaseState {
  pub fn classify(changesets: &[Changeset], publish_script: Option<&str>) -> Self {
    Self {
      has_changesets: !changesets.is_empty(),
      has_non_empty_changesets: changesets.iter().any(|changeset| !changeset.is_empty()),
      has_publish_script: publish_script.is_some_and(|script| !script.trim().is_empty()),
    }
  }
}

/// The single action a run takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
  /// No changesets and no publish script: nothing to do
  Skip,

  /// No changesets but a publish script: publish anything unpublished
  PublishOnly,

  /// Changesets exist but none releases a package: no PR
  SkipEmptyChangesets,

  /// Pending releases: open or update the version PR
  OpenVersionPR,
}

impl ReleaseAction {
  /// Exactly one action per state. Empty changesets win over a
  /// configured publish script: their presence still signals pending
  /// intent, so the run must not publish past them.
  pub fn decide(state: &ReleaseState) -> Self {
    match (state.has_changesets, state.has_non_empty_changesets, state.has_publish_script) {
      (false, _, false) => Self::Skip,
      (false, _, true) => Self::PublishOnly,
      (true, false, _) => Self::SkipEmptyChangesets,
      (true, true, _) => Self::OpenVersionPR,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Skip => "skip",
      Self::PublishOnly => "publish",
      Self::SkipEmptyChangesets => "skip-empty-changesets",
      Self::OpenVersionPR => "open-version-pr",
    }
  }
}

impl std::fmt::Display for ReleaseAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
