//! Integration tests for `railyard status`

use crate::helpers::{TestRepo, describe, run_railyard};
use anyhow::Result;
use std::fs;

#[test]
fn test_status_reports_skip_without_changesets_or_token() -> Result<()> {
  let repo = TestRepo::new()?;

  // Status is read-only and must not require GITHUB_TOKEN
  let output = run_railyard(&repo, &["status"], &[])?;
  assert!(output.status.success(), "{}", describe(&output));

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("No pending changesets"), "{}", stdout);
  assert!(stdout.contains("Next action: skip"), "{}", stdout);
  Ok(())
}

#[test]
fn test_status_json_reports_pending_changesets() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_changeset("brave-dots-cry", "---\n\"pkg-a\": patch\n---\n\nFix the widget\n")?;

  let output = run_railyard(&repo, &["status", "--json"], &[])?;
  assert!(output.status.success(), "{}", describe(&output));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["action"], "open-version-pr");
  assert_eq!(report["has_publish_script"], false);
  assert_eq!(report["changesets"][0]["id"], "brave-dots-cry");
  assert_eq!(report["changesets"][0]["summary"], "Fix the widget");
  assert_eq!(report["changesets"][0]["releases"][0], "pkg-a (patch)");
  Ok(())
}

#[test]
fn test_status_json_sees_publish_script_from_config_file() -> Result<()> {
  let repo = TestRepo::new()?;
  fs::write(repo.path.join("railyard.toml"), "publish = \"npm run release\"\n")?;

  let output = run_railyard(&repo, &["status", "--json"], &[])?;
  assert!(output.status.success(), "{}", describe(&output));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["action"], "publish");
  assert_eq!(report["has_publish_script"], true);
  Ok(())
}

#[test]
fn test_status_human_output_marks_empty_changesets() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_changeset("docs-only", "---\n---\n\nDocs only\n")?;

  let output = run_railyard(&repo, &["status"], &[])?;
  assert!(output.status.success(), "{}", describe(&output));

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("docs-only"), "{}", stdout);
  assert!(stdout.contains("(empty)"), "{}", stdout);
  assert!(stdout.contains("Next action: skip-empty-changesets"), "{}", stdout);
  Ok(())
}
