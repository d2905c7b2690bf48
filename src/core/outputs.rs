//! Step outputs for downstream workflow jobs
//!
//! Outputs land in the file named by `GITHUB_OUTPUT` as `key=value`
//! lines (the file is append-only; later writes of the same key win).
//! Off a runner they go to stdout in the same format so local runs stay
//! inspectable.

use crate::core::error::YardResult;
use serde::Serialize;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
enum Target {
  File(PathBuf),
  Stdout,
}

/// Writer for workflow step outputs
#[derive(Debug, Clone)]
pub struct Outputs {
  target: Target,
}

impl Outputs {
  /// Use the file named by GITHUB_OUTPUT, falling back to stdout
  pub fn from_env() -> Self {
    match env::var_os("GITHUB_OUTPUT") {
      Some(path) if !path.is_empty() => Self::to_path(PathBuf::from(path)),
      _ => Self::stdout(),
    }
  }

  /// Write outputs to a specific file
  pub fn to_path(path: impl Into<PathBuf>) -> Self {
    Self {
      target: Target::File(path.into()),
    }
  }

  /// Write outputs to stdout
  pub fn stdout() -> Self {
    Self { target: Target::Stdout }
  }

  /// Set one output key
  pub fn set(&self, key: &str, value: &str) -> YardResult<()> {
    let entry = render_entry(key, value);
    match &self.target {
      Target::File(path) => {
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        writeln!(file, "{}", entry)?;
      }
      Target::Stdout => {
        println!("{}", entry);
      }
    }
    Ok(())
  }

  /// Set a boolean output ("true"/"false")
  pub fn set_bool(&self, key: &str, value: bool) -> YardResult<()> {
    self.set(key, if value { "true" } else { "false" })
  }

  /// Set an output to a compact JSON rendering of `value`
  pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> YardResult<()> {
    self.set(key, &serde_json::to_string(value)?)
  }
}

/// Render one output entry, using heredoc syntax for multiline values
fn render_entry(key: &str, value: &str) -> String {
  if value.contains('\n') || value.contains('\r') {
    let delim = delimiter_for(value);
    format!("{}<<{}\n{}\n{}", key, delim, value, delim)
  } else {
    format!("{}={}", key, value)
  }
}

/// Pick a heredoc delimiter no line of the value collides with
fn delimiter_for(value: &str) -> String {
  let mut delim = String::from("EOF");
  while value.lines().any(|line| line == delim) {
    delim.push('_');
  }
  delim
}
