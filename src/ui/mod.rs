//! Line-oriented CI output
//!
//! On a GitHub Actions runner these helpers emit workflow commands so
//! errors and warnings surface as run annotations; everywhere else they
//! fall back to plain stderr/stdout lines.

use std::env;

/// True when running under GitHub Actions
pub fn on_actions() -> bool {
  env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Escape message data for a workflow command
///
/// Order matters: `%` first, then the line breaks.
fn escape_data(value: &str) -> String {
  value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Report an error (annotation on Actions, ❌ line otherwise)
pub fn error(message: &str) {
  if on_actions() {
    println!("::error::{}", escape_data(message));
  } else {
    eprintln!("\n❌ {}\n", message);
  }
}

/// Report a warning (annotation on Actions, ⚠️ line otherwise)
pub fn warn(message: &str) {
  if on_actions() {
    println!("::warning::{}", escape_data(message));
  } else {
    eprintln!("⚠️  {}", message);
  }
}

/// Report progress
pub fn info(message: &str) {
  println!("{}", message);
}

/// Run a step inside a collapsible log group
pub fn group<T>(title: &str, f: impl FnOnce() -> T) -> T {
  if on_actions() {
    println!("::group::{}", escape_data(title));
    let result = f();
    println!("::endgroup::");
    result
  } else {
    println!("▶ {}", title);
    f()
  }
}
