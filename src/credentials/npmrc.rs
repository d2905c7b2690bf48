//! Registry credentials (`~/.npmrc`)
//!
//! The user npmrc is shared with the operator: they may have seeded it
//! with their own tokens, and publish tooling reads it directly. The
//! reconciler therefore merges instead of overwriting, and matching is
//! structural (per line) rather than textual, so hosts containing
//! regex metacharacters cannot corrupt the scan.

use crate::core::error::{ConfigError, CredentialError, YardError, YardResult};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// What the reconciler did to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
  /// No file existed; one was created holding the auth line
  Created,
  /// The host already had an auth entry; nothing was written
  AlreadyPresent,
  /// The auth line was appended after the existing content
  Appended,
}

/// Ensure `{home}/.npmrc` holds an auth entry for the registry
///
/// The token is only needed when a line has to be written; a run whose
/// npmrc already covers the registry succeeds without one. An existing
/// entry is never touched, even when its token differs from ours — the
/// operator-supplied value wins.
pub fn reconcile(home: &Path, registry_url: &str, token: Option<&str>) -> YardResult<ReconcileOutcome> {
  let path = home.join(".npmrc");
  let host = registry_host(registry_url);

  if !path.exists() {
    let token = require_token(token)?;
    fs::write(&path, format!("{}\n", auth_line(host, token))).map_err(|e| write_err(&path, e))?;
    return Ok(ReconcileOutcome::Created);
  }

  let content = fs::read_to_string(&path).map_err(|e| {
    YardError::Credential(CredentialError::Read {
      file: path.clone(),
      source: e,
    })
  })?;

  if has_auth_for(&content, host) {
    return Ok(ReconcileOutcome::AlreadyPresent);
  }

  let token = require_token(token)?;
  let mut file = OpenOptions::new()
    .append(true)
    .open(&path)
    .map_err(|e| write_err(&path, e))?;
  // Leading newline keeps the entry on its own line even when the
  // existing file lacks a trailing one.
  write!(file, "\n{}\n", auth_line(host, token)).map_err(|e| write_err(&path, e))?;

  Ok(ReconcileOutcome::Appended)
}

/// True when some line already carries an auth token for `host`
pub fn has_auth_for(content: &str, host: &str) -> bool {
  content
    .lines()
    .any(|line| auth_entry_host(line).is_some_and(|h| h.eq_ignore_ascii_case(host)))
}

/// Normalize a registry URL to the host+path token used in auth lines
///
/// Strips the scheme (so `http://X` and `https://X` refer to the same
/// entry) and any trailing slash (so the canonical line for the default
/// registry reads `//registry.npmjs.org/:_authToken=...`).
pub fn registry_host(registry_url: &str) -> &str {
  let without_scheme = registry_url
    .strip_prefix("https://")
    .or_else(|| registry_url.strip_prefix("http://"))
    .unwrap_or(registry_url);
  without_scheme.trim_end_matches('/')
}

/// Parse one npmrc line as an auth entry, returning its host+path token
///
/// Entry shape: optional leading whitespace, `//`, host, `/:_authToken=`
/// (matched case-insensitively). Anything else — comments, registry
/// assignments, other config keys — is not an auth entry.
fn auth_entry_host(line: &str) -> Option<&str> {
  let rest = line.trim_start().strip_prefix("//")?;
  // ASCII lowercasing preserves byte offsets, so the marker position
  // found here stays valid as an index into `rest`. The marker itself
  // is pure ASCII; host bytes outside ASCII pass through untouched.
  let lower = rest.to_ascii_lowercase();
  let marker = lower.find("/:_authtoken=")?;
  // Some writers double the slash before `:_authToken` when the registry
  // URL carries a trailing one; treat that as the same host.
  Some(rest[..marker].trim_end_matches('/'))
}

fn auth_line(host: &str, token: &str) -> String {
  format!("//{}/:_authToken={}", host, token)
}

fn require_token(token: Option<&str>) -> YardResult<&str> {
  token.ok_or_else(|| YardError::Config(ConfigError::MissingRegistryToken))
}

fn write_err(path: &Path, source: std::io::Error) -> YardError {
  YardError::Credential(CredentialError::Write {
    file: path.to_path_buf(),
    source,
  })
}
