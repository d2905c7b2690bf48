//! Workspace package discovery
//!
//! Runners occasionally need to know what packages live in the tree:
//! the version runner diffs manifest versions around the version script,
//! and both runners pull release notes out of per-package changelogs.
//! `package.json` is the source of truth; directories npm tooling never
//! owns (`node_modules`, VCS metadata) are skipped.

use crate::core::error::YardResult;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A package manifest found in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
  pub name: String,
  pub version: String,
  /// Directory holding the manifest (and its CHANGELOG.md)
  pub dir: PathBuf,
}

#[derive(Deserialize)]
struct RawManifest {
  name: Option<String>,
  version: Option<String>,
}

/// Find every named, versioned package.json under `root`, keyed by name
///
/// Manifests that fail to parse or lack a name/version (workspace roots
/// commonly omit the version) are skipped rather than fatal.
pub fn scan_packages(root: &Path) -> YardResult<HashMap<String, PackageManifest>> {
  let mut packages = HashMap::new();
  scan_into(root, &mut packages)?;
  Ok(packages)
}

fn scan_into(dir: &Path, packages: &mut HashMap<String, PackageManifest>) -> YardResult<()> {
  let manifest_path = dir.join("package.json");
  if manifest_path.is_file() {
    let content = fs::read_to_string(&manifest_path)?;
    if let Ok(RawManifest {
      name: Some(name),
      version: Some(version),
    }) = serde_json::from_str::<RawManifest>(&content)
    {
      packages.insert(
        name.clone(),
        PackageManifest {
          name,
          version,
          dir: dir.to_path_buf(),
        },
      );
    }
  }

  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    if !entry.file_type()?.is_dir() {
      continue;
    }
    let file_name = entry.file_name();

    // Skip vendored and VCS directories
    if file_name == "node_modules" || file_name == ".git" {
      continue;
    }

    scan_into(&entry.path(), packages)?;
  }

  Ok(())
}

/// Extract the changelog section for one version
///
/// Changesets-style changelogs carry one `## {version}` heading per
/// release; the entry runs until the next `## ` heading.
pub fn changelog_entry(changelog: &str, version: &str) -> Option<String> {
  let mut collected: Option<Vec<&str>> = None;

  for line in changelog.lines() {
    if let Some(heading) = line.strip_prefix("## ") {
      if collected.is_some() {
        break;
      }
      if heading.trim() == version {
        collected = Some(Vec::new());
      }
      continue;
    }
    if let Some(lines) = collected.as_mut() {
      lines.push(line);
    }
  }

  collected.map(|lines| lines.join("\n").trim().to_string())
}

/// Read `{dir}/CHANGELOG.md` and extract the entry for `version`
pub fn changelog_entry_for(dir: &Path, version: &str) -> Option<String> {
  let content = fs::read_to_string(dir.join("CHANGELOG.md")).ok()?;
  changelog_entry(&content, version)
}
