//! Publish output scanning
//!
//! The publish script (typically `npx changeset publish`) prints one
//! `New tag: name@version` line per package it published. Those lines
//! are the only reliable record of what actually went out, so the
//! runner scans them rather than re-deriving state from the registry.

use crate::core::error::YardResult;
use crate::host::{HostClient, NewRelease};
use crate::runner::workspace;
use crate::runner::{run_script, PublishOutcome, PublishRequest, PublishRunner, PublishedPackage};
use crate::vcs::SystemGit;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Matches `New tag: pkg@1.2.3` and `New tag: @scope/pkg@1.2.3`,
/// tolerant of log prefixes (the changeset CLI adds an emoji)
static NEW_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"New tag:\s+(@[^/\s]+/[^@\s]+|[^@/\s]+)@(\S+)").expect("Invalid regex pattern for publish tags")
});

/// Publish runner backed by a shell script
pub struct ScriptPublishRunner<'a> {
  git: &'a SystemGit,
  host: &'a dyn HostClient,
  cwd: PathBuf,
}

impl<'a> ScriptPublishRunner<'a> {
  pub fn new(git: &'a SystemGit, host: &'a dyn HostClient, cwd: impl Into<PathBuf>) -> Self {
    Self {
      git,
      host,
      cwd: cwd.into(),
    }
  }

  fn create_releases(&self, packages: &[PublishedPackage]) -> YardResult<()> {
    let manifests = workspace::scan_packages(&self.cwd)?;

    for package in packages {
      let tag = format!("{}@{}", package.name, package.version);
      let body = manifests
        .get(&package.name)
        .and_then(|manifest| workspace::changelog_entry_for(&manifest.dir, &package.version))
        .unwrap_or_default();

      self.host.create_release(&NewRelease {
        tag_name: tag.clone(),
        name: tag,
        body,
        prerelease: package.version.contains('-'),
      })?;
    }

    Ok(())
  }
}

impl PublishRunner for ScriptPublishRunner<'_> {
  fn run_publish(&self, request: &PublishRequest) -> YardResult<PublishOutcome> {
    let stdout = run_script(&request.script, &self.cwd, &request.host_token)?;

    // The script tags published versions locally; make them visible
    // before anything else can fail.
    self.git.push_tags()?;

    let packages = scan_published_packages(&stdout);
    if packages.is_empty() {
      return Ok(PublishOutcome::default());
    }

    if request.create_host_releases {
      self.create_releases(&packages)?;
    }

    Ok(PublishOutcome {
      published: true,
      published_packages: packages,
    })
  }
}

/// Collect published packages from the script's `New tag:` lines
///
/// Versions must parse as semver; lines with anything else are log
/// noise, not publish markers.
pub fn scan_published_packages(stdout: &str) -> Vec<PublishedPackage> {
  let mut packages = Vec::new();

  for line in stdout.lines() {
    let Some(captures) = NEW_TAG_REGEX.captures(line) else {
      continue;
    };
    let version = &captures[2];
    if semver::Version::parse(version).is_err() {
      crate::ui::warn(&format!("Ignoring tag with unparseable version: {}", &captures[0]));
      continue;
    }
    packages.push(PublishedPackage {
      name: captures[1].to_string(),
      version: version.to_string(),
    });
  }

  packages
}
