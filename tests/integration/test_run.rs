//! Integration tests for `railyard run`

use crate::helpers::{TestRepo, describe, git, run_railyard, run_railyard_in};
use anyhow::Result;
use std::fs;

const TOKEN: [(&str, &str); 1] = [("GITHUB_TOKEN", "test-token")];

const PATCH_CHANGESET: &str = "---\n\"pkg-a\": patch\n---\n\nFix the widget\n";
const EMPTY_CHANGESET: &str = "---\n---\n\nDocs only\n";

/// Bumps pkg-a to 1.1.0 and consumes pending changesets, standing in
/// for `npx changeset version`
const BUMP_SCRIPT: &str = "rm -f .changeset/*.md && \
   printf '{\\n  \"name\": \"pkg-a\",\\n  \"version\": \"1.1.0\"\\n}\\n' > package.json && \
   printf '# pkg-a\\n\\n## 1.1.0\\n\\n### Patch Changes\\n\\n- Fix the widget\\n' > CHANGELOG.md";

/// Emits a publish tag line and leaves a marker proving it ran
const PUBLISH_SCRIPT: &str = "printf 'New tag: pkg-a@1.1.0\\n' && touch published.marker";

#[test]
fn test_run_without_token_fails_before_any_side_effect() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_railyard(&repo, &["run"], &[])?;

  assert_eq!(output.status.code(), Some(1), "{}", describe(&output));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("GITHUB_TOKEN"), "{}", stderr);

  assert!(!repo.outputs.exists());
  assert!(!repo.home.join(".netrc").exists());
  Ok(())
}

#[test]
fn test_run_skip_writes_defaults_and_git_credentials() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_railyard(&repo, &["run"], &TOKEN)?;
  assert!(output.status.success(), "{}", describe(&output));

  let outputs = repo.read_outputs()?;
  assert!(outputs.contains("published=false"));
  assert!(outputs.contains("publishedPackages=[]"));
  assert!(outputs.contains("hasChangesets=false"));

  // The host token is always written for git, with no trailing newline
  let netrc = fs::read_to_string(repo.home.join(".netrc"))?;
  assert_eq!(netrc, "machine github.com\nlogin github-actions[bot]\npassword test-token");

  // The registry file is only touched when publishing
  assert!(!repo.home.join(".npmrc").exists());

  // The bot identity replaces the repo's configured user by default
  let name = git(&repo.path, &["config", "user.name"])?;
  assert_eq!(String::from_utf8_lossy(&name.stdout).trim(), "github-actions[bot]");
  Ok(())
}

#[test]
fn test_run_no_git_user_keeps_existing_identity() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_railyard(&repo, &["run", "--no-git-user"], &TOKEN)?;
  assert!(output.status.success(), "{}", describe(&output));

  let name = git(&repo.path, &["config", "user.name"])?;
  assert_eq!(String::from_utf8_lossy(&name.stdout).trim(), "Test User");
  Ok(())
}

#[test]
fn test_run_publish_only_publishes_and_reconciles_registry_auth() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_railyard(
    &repo,
    &["run", "--publish-script", PUBLISH_SCRIPT, "--no-host-releases"],
    &[("GITHUB_TOKEN", "test-token"), ("NPM_TOKEN", "npm-secret")],
  )?;
  assert!(output.status.success(), "{}", describe(&output));

  assert!(repo.path.join("published.marker").exists());

  let outputs = repo.read_outputs()?;
  assert!(outputs.contains("published=true"));
  assert!(outputs.contains(r#"publishedPackages=[{"name":"pkg-a","version":"1.1.0"}]"#));
  assert!(outputs.contains("hasChangesets=false"));

  let npmrc = fs::read_to_string(repo.home.join(".npmrc"))?;
  assert_eq!(npmrc, "//registry.npmjs.org/:_authToken=npm-secret\n");
  Ok(())
}

#[test]
fn test_run_publish_keeps_operator_registry_entries() -> Result<()> {
  let repo = TestRepo::new()?;
  fs::write(
    repo.home.join(".npmrc"),
    "//registry.example.com/:_authToken=operator\n",
  )?;

  let env = [("GITHUB_TOKEN", "test-token"), ("NPM_TOKEN", "npm-secret")];
  let args = ["run", "--publish-script", PUBLISH_SCRIPT, "--no-host-releases"];

  let output = run_railyard(&repo, &args, &env)?;
  assert!(output.status.success(), "{}", describe(&output));

  let after_first = fs::read_to_string(repo.home.join(".npmrc"))?;
  assert!(after_first.contains("//registry.example.com/:_authToken=operator"));
  assert!(after_first.contains("//registry.npmjs.org/:_authToken=npm-secret"));

  // Re-running must not duplicate the entry
  let output = run_railyard(&repo, &args, &env)?;
  assert!(output.status.success(), "{}", describe(&output));
  assert_eq!(fs::read_to_string(repo.home.join(".npmrc"))?, after_first);
  Ok(())
}

#[test]
fn test_run_publish_without_registry_token_fails_before_the_script() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_railyard(&repo, &["run", "--publish-script", PUBLISH_SCRIPT, "--no-host-releases"], &TOKEN)?;

  assert_eq!(output.status.code(), Some(1), "{}", describe(&output));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("NPM_TOKEN"), "{}", stderr);
  assert!(!repo.path.join("published.marker").exists());
  Ok(())
}

#[test]
fn test_run_publish_with_unreadable_npmrc_is_a_system_error() -> Result<()> {
  let repo = TestRepo::new()?;
  // A directory in place of the auth file makes it unreadable
  fs::create_dir(repo.home.join(".npmrc"))?;

  let output = run_railyard(
    &repo,
    &["run", "--publish-script", PUBLISH_SCRIPT, "--no-host-releases"],
    &[("GITHUB_TOKEN", "test-token"), ("NPM_TOKEN", "npm-secret")],
  )?;

  assert_eq!(output.status.code(), Some(2), "{}", describe(&output));
  assert!(!repo.path.join("published.marker").exists());
  Ok(())
}

#[test]
fn test_run_empty_changesets_do_not_publish() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_changeset("docs-only", EMPTY_CHANGESET)?;
  repo.commit("docs changeset")?;

  let output = run_railyard(
    &repo,
    &["run", "--publish-script", PUBLISH_SCRIPT, "--no-host-releases"],
    &[("GITHUB_TOKEN", "test-token"), ("NPM_TOKEN", "npm-secret")],
  )?;
  assert!(output.status.success(), "{}", describe(&output));

  let outputs = repo.read_outputs()?;
  assert!(outputs.contains("hasChangesets=true"));
  assert!(outputs.contains("published=false"));
  assert!(!repo.path.join("published.marker").exists());
  Ok(())
}

#[test]
fn test_run_version_pushes_branch_even_when_host_is_unreachable() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_changeset("brave-dots-cry", PATCH_CHANGESET)?;
  repo.commit("add changeset")?;

  let output = run_railyard(
    &repo,
    &["run", "--version-script", BUMP_SCRIPT],
    &[
      ("GITHUB_TOKEN", "test-token"),
      ("GITHUB_REPOSITORY", "acme/widgets"),
      ("GITHUB_API_URL", "http://127.0.0.1:1"),
    ],
  )?;

  // The PR API is unreachable, but the branch work happens first
  assert_eq!(output.status.code(), Some(2), "{}", describe(&output));
  assert!(repo.origin_has_branch("changeset-release/main"));
  assert_eq!(repo.origin_tip_subject("changeset-release/main")?, "Version Packages");

  assert!(repo.read_outputs()?.contains("hasChangesets=true"));

  // The changeset was consumed on the version branch
  assert!(!repo.path.join(".changeset/brave-dots-cry.md").exists());
  let manifest = fs::read_to_string(repo.path.join("package.json"))?;
  assert!(manifest.contains("1.1.0"));
  Ok(())
}

#[test]
fn test_run_version_branch_is_rebuilt_on_rerun() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_changeset("brave-dots-cry", PATCH_CHANGESET)?;
  repo.commit("add changeset")?;

  let env = [
    ("GITHUB_TOKEN", "test-token"),
    ("GITHUB_REPOSITORY", "acme/widgets"),
    ("GITHUB_API_URL", "http://127.0.0.1:1"),
  ];

  let first = run_railyard(&repo, &["run", "--version-script", BUMP_SCRIPT], &env)?;
  assert_eq!(first.status.code(), Some(2), "{}", describe(&first));

  // Back to main with another changeset, as if more work merged
  git(&repo.path, &["checkout", "--quiet", "main"])?;
  repo.write_changeset("tidy-socks-march", PATCH_CHANGESET)?;
  repo.commit("another changeset")?;

  let second = run_railyard(&repo, &["run", "--version-script", BUMP_SCRIPT], &env)?;
  assert_eq!(second.status.code(), Some(2), "{}", describe(&second));

  // The rebuilt branch sits on the new trigger commit: exactly one
  // version commit on top of it
  let log = git(&repo.path, &["log", "--format=%s", "changeset-release/main"])?;
  let subjects: Vec<String> = String::from_utf8_lossy(&log.stdout).lines().map(String::from).collect();
  assert_eq!(subjects[0], "Version Packages");
  assert_eq!(subjects[1], "another changeset");
  assert_eq!(subjects.iter().filter(|s| *s == "Version Packages").count(), 1);
  Ok(())
}

#[test]
fn test_run_failing_script_exits_with_runner_code() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_railyard(
    &repo,
    &["run", "--publish-script", "echo boom >&2 && exit 7", "--no-host-releases"],
    &[("GITHUB_TOKEN", "test-token"), ("NPM_TOKEN", "npm-secret")],
  )?;

  assert_eq!(output.status.code(), Some(3), "{}", describe(&output));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("boom"), "{}", stderr);
  Ok(())
}

#[test]
fn test_run_cwd_flag_switches_directory_first() -> Result<()> {
  let repo = TestRepo::new()?;
  let work = repo.path.display().to_string();

  let output = run_railyard_in(&repo, &repo.home, &["run", "--cwd", &work], &TOKEN)?;
  assert!(output.status.success(), "{}", describe(&output));

  assert!(repo.read_outputs()?.contains("hasChangesets=false"));
  Ok(())
}
