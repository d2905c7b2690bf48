//! Read pending changesets from `.changeset/`

use crate::changeset::{Bump, Changeset, Release};
use crate::core::error::{ChangesetError, YardError, YardResult};
use std::fs;
use std::path::Path;

/// Directory holding pending changesets
pub const CHANGESET_DIR: &str = ".changeset";

/// Read every pending changeset under `{root}/.changeset`
///
/// A missing directory yields an empty list. Files come back sorted by
/// name so repeated runs see the same sequence.
pub fn read_changesets(root: &Path) -> YardResult<Vec<Changeset>> {
  let dir = root.join(CHANGESET_DIR);
  if !dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut paths: Vec<_> = fs::read_dir(&dir)?
    .collect::<Result<Vec<_>, _>>()?
    .into_iter()
    .map(|entry| entry.path())
    .filter(|path| is_changeset_file(path))
    .collect();
  paths.sort();

  let mut changesets = Vec::with_capacity(paths.len());
  for path in paths {
    let content = fs::read_to_string(&path)?;
    changesets.push(parse_changeset(&path, &content)?);
  }

  Ok(changesets)
}

/// Changeset files are markdown, not hidden, and not the README
fn is_changeset_file(path: &Path) -> bool {
  let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
    return false;
  };
  name.ends_with(".md") && name != "README.md" && !name.starts_with('.')
}

/// Parse one changeset file
///
/// Format: a `---` fence pair holding `"package": bump` lines, followed
/// by a free-form summary. The frontmatter block may be empty.
fn parse_changeset(path: &Path, content: &str) -> YardResult<Changeset> {
  let id = match path.file_stem().and_then(|s| s.to_str()) {
    Some(stem) => stem.to_string(),
    None => return Err(malformed(path, "file name is not valid UTF-8")),
  };

  let mut lines = content.lines();

  loop {
    match lines.next() {
      Some(line) if line.trim().is_empty() => continue,
      Some(line) if line.trim() == "---" => break,
      _ => return Err(malformed(path, "missing opening --- fence")),
    }
  }

  let mut releases = Vec::new();
  let mut closed = false;
  for line in lines.by_ref() {
    if line.trim() == "---" {
      closed = true;
      break;
    }
    if line.trim().is_empty() {
      continue;
    }
    releases.push(parse_release_line(path, line)?);
  }
  if !closed {
    return Err(malformed(path, "missing closing --- fence"));
  }

  let summary = lines.collect::<Vec<_>>().join("\n").trim().to_string();

  Ok(Changeset { id, summary, releases })
}

/// Parse a `"package": bump` frontmatter line (quotes optional)
fn parse_release_line(path: &Path, line: &str) -> YardResult<Release> {
  let Some((name_part, bump_part)) = line.split_once(':') else {
    return Err(malformed(
      path,
      &format!("expected `\"package\": bump`, found `{}`", line.trim()),
    ));
  };

  let name = name_part.trim().trim_matches('"').trim_matches('\'').to_string();
  if name.is_empty() {
    return Err(malformed(path, "empty package name"));
  }

  let bump_word = bump_part.trim();
  let Some(bump) = Bump::parse(bump_word) else {
    return Err(malformed(path, &format!("unknown bump type `{}` for `{}`", bump_word, name)));
  };

  Ok(Release { name, bump })
}

fn malformed(path: &Path, message: &str) -> YardError {
  YardError::Changeset(ChangesetError::Malformed {
    file: path.to_path_buf(),
    message: message.to_string(),
  })
}
