//! Source-control credentials (`~/.netrc`)

use crate::core::error::{CredentialError, YardError, YardResult};
use std::fs;
use std::path::Path;

/// Bot identity used for pushes and the version commit
pub const BOT_LOGIN: &str = "github-actions[bot]";

const GIT_HOST: &str = "github.com";

/// Overwrite `{home}/.netrc` with a single machine record for the bot
///
/// Overwriting (rather than merging) is deliberate: the file lives in
/// the run's ephemeral home directory and must hold exactly the token
/// this run was given.
pub fn write(home: &Path, token: &str) -> YardResult<()> {
  let path = home.join(".netrc");
  let record = format!("machine {}\nlogin {}\npassword {}", GIT_HOST, BOT_LOGIN, token);
  fs::write(&path, record).map_err(|e| {
    YardError::Credential(CredentialError::Write {
      file: path.clone(),
      source: e,
    })
  })?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_write_creates_machine_record() {
    let home = TempDir::new().unwrap();
    write(home.path(), "token-123").unwrap();

    let content = fs::read_to_string(home.path().join(".netrc")).unwrap();
    assert_eq!(content, "machine github.com\nlogin github-actions[bot]\npassword token-123");
  }

  #[test]
  fn test_write_replaces_previous_content() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".netrc"), "machine example.com\nlogin old\npassword stale").unwrap();

    write(home.path(), "fresh-token").unwrap();

    let content = fs::read_to_string(home.path().join(".netrc")).unwrap();
    assert!(!content.contains("example.com"));
    assert!(content.contains("password fresh-token"));
  }

  #[test]
  fn test_write_failure_is_credential_error() {
    let home = TempDir::new().unwrap();
    fs::create_dir(home.path().join(".netrc")).unwrap();

    let err = write(home.path(), "token").unwrap_err();
    assert_eq!(err.exit_code().as_i32(), 2);
    assert!(err.to_string().contains(".netrc"));
  }
}
