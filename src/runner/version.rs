//! Version PR maintenance
//!
//! One branch per base branch (`changeset-release/{base}`) carries the
//! aggregated version bumps. Every run rebuilds that branch from the
//! triggering commit and force-pushes it, so the PR always reflects the
//! changesets currently on the base branch — merging older runs is
//! never possible by accident.

use crate::core::error::YardResult;
use crate::host::HostClient;
use crate::runner::workspace::{self, PackageManifest};
use crate::runner::{run_script, VersionOutcome, VersionRequest, VersionRunner};
use crate::vcs::SystemGit;
use std::collections::HashMap;
use std::path::PathBuf;

/// Command applying pending changesets when no override is configured
pub const DEFAULT_VERSION_SCRIPT: &str = "npx changeset version";

/// Hosts cap PR body size; beyond this the body degrades to headers,
/// then to a bare note
pub const MAX_BODY_LENGTH: usize = 60_000;

/// Branch the version PR is opened from
pub fn version_branch(base: &str) -> String {
  format!("changeset-release/{}", base)
}

/// One package's section in the PR body
#[derive(Debug, Clone)]
pub struct PackageSection {
  /// `## name@version`
  pub header: String,

  /// Changelog entry for the new version, when one exists
  pub content: Option<String>,
}

/// Version runner backed by a shell script
pub struct ScriptVersionRunner<'a> {
  git: &'a SystemGit,
  host: &'a dyn HostClient,
  cwd: PathBuf,
  host_token: String,
}

impl<'a> ScriptVersionRunner<'a> {
  pub fn new(git: &'a SystemGit, host: &'a dyn HostClient, cwd: impl Into<PathBuf>, host_token: impl Into<String>) -> Self {
    Self {
      git,
      host,
      cwd: cwd.into(),
      host_token: host_token.into(),
    }
  }

  fn resolve_base(&self, request: &VersionRequest) -> YardResult<String> {
    if let Some(branch) = &request.branch {
      return Ok(branch.clone());
    }
    let current = self.git.current_branch()?;
    Ok(if current == "HEAD" { "main".to_string() } else { current })
  }
}

impl VersionRunner for ScriptVersionRunner<'_> {
  fn run_version(&self, request: &VersionRequest) -> YardResult<VersionOutcome> {
    let base = self.resolve_base(request)?;
    let branch = version_branch(&base);
    let head = self.git.head_sha()?;

    self.git.switch_to_maybe_existing_branch(&branch)?;
    self.git.reset_hard(&head)?;

    let versions_before: HashMap<String, String> = workspace::scan_packages(&self.cwd)?
      .into_iter()
      .map(|(name, manifest)| (name, manifest.version))
      .collect();

    let script = request.script.as_deref().unwrap_or(DEFAULT_VERSION_SCRIPT);
    run_script(script, &self.cwd, &self.host_token)?;

    let sections = changed_package_sections(&versions_before, workspace::scan_packages(&self.cwd)?);

    // A version script configured to commit on its own leaves a clean
    // tree; only commit what the script left behind.
    if !self.git.is_clean()? {
      self.git.commit_all(&request.commit_message)?;
    }

    self.git.push_branch(&branch, true)?;

    let body = build_pr_body(request.has_publish_script, &base, &sections);

    let number = match self.host.find_open_pull_request(&branch, &base)? {
      Some(existing) => {
        crate::ui::info(&format!("Updating existing pull request #{}", existing.number));
        self.host.update_pull_request(existing.number, &request.pr_title, &body)?;
        existing.number
      }
      None => {
        crate::ui::info("Creating pull request");
        self.host.create_pull_request(&request.pr_title, &body, &branch, &base)?.number
      }
    };

    Ok(VersionOutcome {
      pull_request_number: Some(number),
    })
  }
}

/// Sections for every package whose manifest version changed across the
/// version script (new packages count as changed), ordered by name
fn changed_package_sections(
  before: &HashMap<String, String>,
  after: HashMap<String, PackageManifest>,
) -> Vec<PackageSection> {
  let mut changed: Vec<PackageManifest> = after
    .into_values()
    .filter(|manifest| before.get(&manifest.name) != Some(&manifest.version))
    .collect();
  changed.sort_by(|a, b| a.name.cmp(&b.name));

  changed
    .into_iter()
    .map(|manifest| PackageSection {
      header: format!("## {}@{}", manifest.name, manifest.version),
      content: workspace::changelog_entry_for(&manifest.dir, &manifest.version),
    })
    .collect()
}

/// Assemble the PR body, degrading in stages when it would exceed the
/// size limit: full changelogs, then headers only, then a bare note
pub fn build_pr_body(has_publish_script: bool, base: &str, sections: &[PackageSection]) -> String {
  let preamble = format!(
    "This PR was opened by railyard. When you're ready to do a release, you can merge this and {}. \
     If you're not ready to do a release yet, that's fine, whenever you add more changesets to {}, \
     this PR will be updated.",
    if has_publish_script {
      "the packages will be published to the registry automatically"
    } else {
      "publish to the registry yourself or set up railyard to publish automatically"
    },
    base
  );

  let full = assemble(&preamble, None, sections, true);
  if full.chars().count() <= MAX_BODY_LENGTH {
    return full;
  }

  let headers_only = assemble(
    &preamble,
    Some("\n> The changelog information of each package has been omitted from this message, as the content exceeds the size limit.\n"),
    sections,
    false,
  );
  if headers_only.chars().count() <= MAX_BODY_LENGTH {
    return headers_only;
  }

  assemble(
    &preamble,
    Some("\n> All release information have been omitted from this message, as the content exceeds the size limit."),
    &[],
    false,
  )
}

fn assemble(preamble: &str, note: Option<&str>, sections: &[PackageSection], with_content: bool) -> String {
  let mut parts = vec![preamble.to_string(), "# Releases".to_string()];
  if let Some(note) = note {
    parts.push(note.to_string());
  }
  for section in sections {
    if with_content {
      parts.push(format!("{}\n\n{}", section.header, section.content.as_deref().unwrap_or("")));
    } else {
      parts.push(format!("{}\n", section.header));
    }
  }
  parts.join("\n")
}
