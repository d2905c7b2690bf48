use crate::core::error::{ConfigError, YardError, YardResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Registry consulted when no `--registry` override is given
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

/// Title and commit message used for the version PR unless overridden
pub const DEFAULT_PR_TITLE: &str = "Version Packages";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Version Packages";

/// Optional file configuration for railyard
/// Searched in order: railyard.toml, .railyard.toml, .config/railyard.toml
///
/// Every field mirrors a `run` flag; the command line wins on conflict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
  /// Publish script (e.g. "npx changeset publish")
  #[serde(default)]
  pub publish: Option<String>,

  /// Version script overriding the built-in `npx changeset version`
  #[serde(default)]
  pub version: Option<String>,

  /// Title for the version PR
  #[serde(default)]
  pub title: Option<String>,

  /// Commit message for the version commit
  #[serde(default)]
  pub commit: Option<String>,

  /// Base branch the version PR targets
  #[serde(default)]
  pub branch: Option<String>,

  /// Registry URL for the publish auth entry
  #[serde(default)]
  pub registry: Option<String>,

  /// Configure the bot git identity before pushing (default: true)
  #[serde(default)]
  pub git_user: Option<bool>,

  /// Create host releases for published tags (default: true)
  #[serde(default)]
  pub host_releases: Option<bool>,
}

impl FileConfig {
  /// Find config file in search order: railyard.toml, .railyard.toml, .config/railyard.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("railyard.toml"),
      path.join(".railyard.toml"),
      path.join(".config").join("railyard.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the optional config file; absence is not an error
  pub fn load(path: &Path) -> YardResult<Option<Self>> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(None);
    };

    let content = fs::read_to_string(&config_path).map_err(|e| {
      YardError::Config(ConfigError::InvalidConfigFile {
        path: config_path.clone(),
        message: e.to_string(),
      })
    })?;
    let config: FileConfig = toml_edit::de::from_str(&content).map_err(|e| {
      YardError::Config(ConfigError::InvalidConfigFile {
        path: config_path.clone(),
        message: e.to_string(),
      })
    })?;

    Ok(Some(config))
  }
}

/// Values given on the `run` command line, before merging with the file
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
  pub publish: Option<String>,
  pub version: Option<String>,
  pub title: Option<String>,
  pub commit: Option<String>,
  pub branch: Option<String>,
  pub registry: Option<String>,
  pub no_git_user: bool,
  pub no_host_releases: bool,
}

/// Fully-resolved inputs for one run
///
/// Nothing downstream of this struct reads configuration from the
/// environment; resolution happens exactly once, here.
#[derive(Debug, Clone)]
pub struct RunConfig {
  /// Script that publishes to the registry; absence means this workflow
  /// never publishes and railyard only manages the version PR
  pub publish_script: Option<String>,

  /// Script that applies pending changesets; absence selects the
  /// built-in `npx changeset version`
  pub version_script: Option<String>,

  /// Title for the version PR
  pub pr_title: String,

  /// Message for the version commit
  pub commit_message: String,

  /// Base branch the version PR targets; absence means the currently
  /// checked-out branch
  pub base_branch: Option<String>,

  /// Registry whose auth entry is reconciled before publishing
  pub registry_url: String,

  /// Configure the bot git identity before committing or pushing
  pub setup_git_user: bool,

  /// Create a host release per published tag
  pub create_host_releases: bool,
}

impl RunConfig {
  /// Merge command-line values over the config file over defaults
  pub fn resolve(cli: RunOverrides, file: Option<FileConfig>) -> Self {
    let file = file.unwrap_or_default();

    Self {
      publish_script: normalize(cli.publish).or_else(|| normalize(file.publish)),
      version_script: normalize(cli.version).or_else(|| normalize(file.version)),
      pr_title: normalize(cli.title)
        .or_else(|| normalize(file.title))
        .unwrap_or_else(|| DEFAULT_PR_TITLE.to_string()),
      commit_message: normalize(cli.commit)
        .or_else(|| normalize(file.commit))
        .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
      base_branch: normalize(cli.branch).or_else(|| normalize(file.branch)),
      registry_url: normalize(cli.registry)
        .or_else(|| normalize(file.registry))
        .unwrap_or_else(|| DEFAULT_REGISTRY.to_string()),
      setup_git_user: !cli.no_git_user && file.git_user.unwrap_or(true),
      create_host_releases: !cli.no_host_releases && file.host_releases.unwrap_or(true),
    }
  }
}

/// Treat empty and whitespace-only values as absent
///
/// CI workflows frequently pass `""` for inputs they leave blank; an
/// empty publish script must not count as "this workflow publishes".
fn normalize(value: Option<String>) -> Option<String> {
  value.and_then(|v| {
    let trimmed = v.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
  })
}

/// Secrets and locations read from the process environment
///
/// Captured once at startup so the rest of the run works from explicit
/// values instead of scattered `env::var` calls.
#[derive(Clone)]
pub struct EnvInputs {
  /// Home directory holding the credential files
  pub home: Option<PathBuf>,

  /// Host platform token; every run requires it
  pub github_token: Option<String>,

  /// Registry token; only consulted when a publish run has to write a
  /// missing auth entry
  pub npm_token: Option<String>,
}

impl EnvInputs {
  /// Capture HOME, GITHUB_TOKEN and NPM_TOKEN
  pub fn from_env() -> Self {
    Self {
      home: env::var_os("HOME").map(PathBuf::from),
      github_token: env::var("GITHUB_TOKEN").ok().filter(|v| !v.trim().is_empty()),
      npm_token: env::var("NPM_TOKEN").ok().filter(|v| !v.trim().is_empty()),
    }
  }

  /// The host token, or the fatal error every run starts by checking for
  pub fn require_github_token(&self) -> YardResult<&str> {
    self
      .github_token
      .as_deref()
      .ok_or_else(|| YardError::Config(ConfigError::MissingHostToken))
  }

  /// The home directory, required before touching credential files
  pub fn require_home(&self) -> YardResult<&Path> {
    self
      .home
      .as_deref()
      .ok_or_else(|| YardError::Config(ConfigError::MissingHome))
  }
}

impl fmt::Debug for EnvInputs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EnvInputs")
      .field("home", &self.home)
      .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
      .field("npm_token", &self.npm_token.as_ref().map(|_| "[REDACTED]"))
      .finish()
  }
}
