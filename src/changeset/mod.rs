//! Pending changesets
//!
//! A changeset is a markdown file under `.changeset/` recording which
//! packages a change touches and how hard to bump each one. They are
//! written by contributors (via `npx changeset`) and consumed here to
//! decide whether a run opens a version PR.

pub mod read;

use serde::{Deserialize, Serialize};

/// Version bump magnitude declared by a changeset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
  /// Breaking change
  Major,
  /// New functionality
  Minor,
  /// Fix or internal change
  Patch,
  /// Named without a version effect (dependents-only entry)
  None,
}

impl Bump {
  /// Parse a frontmatter bump word
  pub fn parse(word: &str) -> Option<Self> {
    match word {
      "major" => Some(Bump::Major),
      "minor" => Some(Bump::Minor),
      "patch" => Some(Bump::Patch),
      "none" => Some(Bump::None),
      _ => None,
    }
  }

  /// The frontmatter spelling
  pub fn as_str(self) -> &'static str {
    match self {
      Bump::Major => "major",
      Bump::Minor => "minor",
      Bump::Patch => "patch",
      Bump::None => "none",
    }
  }
}

/// One package affected by a changeset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
  pub name: String,
  pub bump: Bump,
}

/// A pending release note parsed from `.changeset/{id}.md`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
  /// File stem, e.g. `brave-pandas-sneeze`
  pub id: String,

  /// Human-readable description from the file body
  pub summary: String,

  /// Affected packages; empty for documentation-only notes
  pub releases: Vec<Release>,
}

impl Changeset {
  /// True when this changeset carries no version effect
  pub fn is_empty(&self) -> bool {
    self.releases.is_empty()
  }
}
