//! Error types for railyard with contextual messages and exit codes
//!
//! One unified error type categorizes every failure a run can hit:
//! configuration, changeset parsing, credential files, git, the host
//! platform API, and the publish/version scripts. No error is retried or
//! downgraded — every failure aborts the run and surfaces here.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for railyard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, malformed changesets, invalid args)
  User = 1,
  /// System error (credential files, git, host API, I/O)
  System = 2,
  /// A publish or version script failed
  Runner = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for railyard
#[derive(Debug)]
pub enum YardError {
  /// Configuration errors (missing tokens, bad railyard.toml)
  Config(ConfigError),

  /// Malformed change descriptor files
  Changeset(ChangesetError),

  /// Credential file read/write failures
  Credential(CredentialError),

  /// Git operation errors
  Git(GitError),

  /// Host platform API errors
  Host(HostError),

  /// Publish/version script failures
  Runner(RunnerError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl YardError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    YardError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    YardError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      YardError::Message { message, context, help } => YardError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      YardError::Config(_) => ExitCode::User,
      YardError::Changeset(_) => ExitCode::User,
      YardError::Credential(_) => ExitCode::System,
      YardError::Git(_) => ExitCode::System,
      YardError::Host(_) => ExitCode::System,
      YardError::Runner(_) => ExitCode::Runner,
      YardError::Io(_) => ExitCode::System,
      YardError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      YardError::Config(e) => e.help_message(),
      YardError::Git(e) => e.help_message(),
      YardError::Host(e) => e.help_message(),
      YardError::Runner(e) => e.help_message(),
      YardError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for YardError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      YardError::Config(e) => write!(f, "{}", e),
      YardError::Changeset(e) => write!(f, "{}", e),
      YardError::Credential(e) => write!(f, "{}", e),
      YardError::Git(e) => write!(f, "{}", e),
      YardError::Host(e) => write!(f, "{}", e),
      YardError::Runner(e) => write!(f, "{}", e),
      YardError::Io(e) => write!(f, "I/O error: {}", e),
      YardError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for YardError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      YardError::Io(e) => Some(e),
      YardError::Credential(CredentialError::Read { source, .. }) => Some(source),
      YardError::Credential(CredentialError::Write { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for YardError {
  fn from(err: io::Error) -> Self {
    YardError::Io(err)
  }
}

impl From<String> for YardError {
  fn from(msg: String) -> Self {
    YardError::message(msg)
  }
}

impl From<&str> for YardError {
  fn from(msg: &str) -> Self {
    YardError::message(msg)
  }
}

impl From<ConfigError> for YardError {
  fn from(err: ConfigError) -> Self {
    YardError::Config(err)
  }
}

impl From<ChangesetError> for YardError {
  fn from(err: ChangesetError) -> Self {
    YardError::Changeset(err)
  }
}

impl From<CredentialError> for YardError {
  fn from(err: CredentialError) -> Self {
    YardError::Credential(err)
  }
}

impl From<GitError> for YardError {
  fn from(err: GitError) -> Self {
    YardError::Git(err)
  }
}

impl From<HostError> for YardError {
  fn from(err: HostError) -> Self {
    YardError::Host(err)
  }
}

impl From<RunnerError> for YardError {
  fn from(err: RunnerError) -> Self {
    YardError::Runner(err)
  }
}

impl From<serde_json::Error> for YardError {
  fn from(err: serde_json::Error) -> Self {
    YardError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for YardError {
  fn from(err: toml_edit::de::Error) -> Self {
    YardError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<reqwest::Error> for YardError {
  fn from(err: reqwest::Error) -> Self {
    YardError::Host(HostError::Transport {
      message: err.to_string(),
    })
  }
}

impl From<std::string::FromUtf8Error> for YardError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    YardError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// The host platform token is missing from the environment
  MissingHostToken,

  /// A registry token is needed to write the auth entry but is not set
  MissingRegistryToken,

  /// HOME is not set, so credential files have no destination
  MissingHome,

  /// The configured working directory cannot be entered
  WorkingDirectory { path: PathBuf, reason: String },

  /// railyard.toml exists but cannot be parsed
  InvalidConfigFile { path: PathBuf, message: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingHostToken => Some(
        "Export GITHUB_TOKEN (a token with contents and pull-request write access) before running railyard.".to_string(),
      ),
      ConfigError::MissingRegistryToken => Some(
        "Export NPM_TOKEN so railyard can write the registry auth entry, or add the entry to ~/.npmrc yourself."
          .to_string(),
      ),
      ConfigError::InvalidConfigFile { path, .. } => {
        Some(format!("Fix or remove {} and re-run.", path.display()))
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingHostToken => {
        write!(f, "GITHUB_TOKEN is not set; railyard cannot authenticate to the host platform")
      }
      ConfigError::MissingRegistryToken => {
        write!(f, "NPM_TOKEN is not set and the registry has no auth entry in .npmrc")
      }
      ConfigError::MissingHome => {
        write!(f, "HOME is not set; cannot locate the credential files")
      }
      ConfigError::WorkingDirectory { path, reason } => {
        write!(f, "Cannot change into working directory {}: {}", path.display(), reason)
      }
      ConfigError::InvalidConfigFile { path, message } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), message)
      }
    }
  }
}

/// Malformed change descriptor files
#[derive(Debug)]
pub enum ChangesetError {
  /// A changeset file has unusable frontmatter
  Malformed { file: PathBuf, message: String },
}

impl fmt::Display for ChangesetError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChangesetError::Malformed { file, message } => {
        write!(f, "Malformed changeset {}: {}", file.display(), message)
      }
    }
  }
}

/// Credential file errors
#[derive(Debug)]
pub enum CredentialError {
  /// Reading an existing credential file failed
  Read { file: PathBuf, source: io::Error },

  /// Writing or appending to a credential file failed
  Write { file: PathBuf, source: io::Error },
}

impl fmt::Display for CredentialError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CredentialError::Read { file, source } => {
        write!(f, "Failed to read credential file {}: {}", file.display(), source)
      }
      CredentialError::Write { file, source } => {
        write!(f, "Failed to write credential file {}: {}", file.display(), source)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("non-fast-forward") {
          Some("The remote moved underneath this run. Re-run the workflow to retry from fresh state.".to_string())
        } else if stderr.contains("permission denied") || stderr.contains("403") {
          Some("Check that the host token can push to this repository.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "railyard must run inside a git checkout; nothing found at {}",
        path.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Host platform API errors
#[derive(Debug)]
pub enum HostError {
  /// The API rejected a request
  Api { status: u16, message: String },

  /// The request never produced a response
  Transport { message: String },

  /// GITHUB_REPOSITORY is unset, so API paths cannot be built
  MissingRepository,
}

impl HostError {
  fn help_message(&self) -> Option<String> {
    match self {
      HostError::Api { status: 401 | 403, .. } => {
        Some("Check that GITHUB_TOKEN is valid and has pull-request and release write access.".to_string())
      }
      HostError::MissingRepository => {
        Some("Set GITHUB_REPOSITORY to owner/repo (provided automatically on CI runners).".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for HostError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HostError::Api { status, message } => {
        write!(f, "Host API request failed with status {}: {}", status, message)
      }
      HostError::Transport { message } => {
        write!(f, "Host API request failed: {}", message)
      }
      HostError::MissingRepository => {
        write!(f, "GITHUB_REPOSITORY is not set; cannot address the host repository")
      }
    }
  }
}

/// Publish/version script failures
#[derive(Debug)]
pub enum RunnerError {
  /// The script could not be spawned at all
  Spawn { script: String, source: io::Error },

  /// The script ran and exited non-zero
  ScriptFailed { script: String, stderr: String },
}

impl RunnerError {
  fn help_message(&self) -> Option<String> {
    match self {
      RunnerError::Spawn { .. } => Some("Scripts run via `sh -c`; check that the command exists on PATH.".to_string()),
      RunnerError::ScriptFailed { .. } => None,
    }
  }
}

impl fmt::Display for RunnerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunnerError::Spawn { script, source } => {
        write!(f, "Failed to spawn script `{}`: {}", script, source)
      }
      RunnerError::ScriptFailed { script, stderr } => {
        write!(f, "Script `{}` failed:\n{}", script, stderr)
      }
    }
  }
}

/// Result type alias for railyard
pub type YardResult<T> = Result<T, YardError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> YardResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> YardResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<YardError>,
{
  fn context(self, ctx: impl Into<String>) -> YardResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> YardResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &YardError) {
  crate::ui::error(&error.to_string());

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to YardError (for ad-hoc call sites)
impl From<anyhow::Error> for YardError {
  fn from(err: anyhow::Error) -> Self {
    YardError::message(err.to_string())
  }
}
