//! Host platform API (GitHub REST)
//!
//! A minimal blocking client for the three things a run may need from
//! the host: finding, creating and updating the version PR, and cutting
//! releases for published tags. The `HostClient` trait is the seam the
//! runners are tested through.

use crate::core::error::{HostError, YardError, YardResult};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "railyard";

/// Longest error-body excerpt carried into a HostError
const BODY_EXCERPT_LEN: usize = 300;

/// A pull request as the host reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
  pub number: u64,
}

/// Fields for a new host release
#[derive(Debug, Clone, Serialize)]
pub struct NewRelease {
  pub tag_name: String,
  pub name: String,
  pub body: String,
  pub prerelease: bool,
}

/// Host operations the runners depend on
pub trait HostClient {
  /// Find the open PR from `head` onto `base`, if any
  fn find_open_pull_request(&self, head: &str, base: &str) -> YardResult<Option<PullRequest>>;

  /// Open a PR and return it
  fn create_pull_request(&self, title: &str, body: &str, head: &str, base: &str) -> YardResult<PullRequest>;

  /// Retitle/rewrite an existing PR
  fn update_pull_request(&self, number: u64, title: &str, body: &str) -> YardResult<()>;

  /// Create a release for a pushed tag
  fn create_release(&self, release: &NewRelease) -> YardResult<()>;
}

/// GitHub REST v3 client over blocking HTTP
pub struct GitHubClient {
  http: reqwest::blocking::Client,
  api_base: String,
  /// `owner/repo`; absent off-runner, required lazily so runs that
  /// never touch the host still work
  repo: Option<String>,
  token: String,
}

impl GitHubClient {
  pub fn new(api_base: impl Into<String>, repo: Option<String>, token: impl Into<String>) -> Self {
    Self {
      http: reqwest::blocking::Client::new(),
      api_base: api_base.into(),
      repo,
      token: token.into(),
    }
  }

  /// Build from the runner environment: repository coordinates from
  /// GITHUB_REPOSITORY, API root from GITHUB_API_URL
  pub fn from_env(token: impl Into<String>) -> Self {
    let api_base = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let repo = env::var("GITHUB_REPOSITORY").ok().filter(|r| !r.is_empty());
    Self::new(api_base, repo, token)
  }

  fn repo(&self) -> YardResult<&str> {
    self
      .repo
      .as_deref()
      .ok_or_else(|| YardError::Host(HostError::MissingRepository))
  }

  fn owner(&self) -> YardResult<&str> {
    let repo = self.repo()?;
    Ok(repo.split('/').next().unwrap_or(repo))
  }

  fn url(&self, path: &str) -> YardResult<String> {
    Ok(format!("{}/repos/{}{}", self.api_base.trim_end_matches('/'), self.repo()?, path))
  }

  /// Attach standard headers, send, and map non-2xx to HostError
  fn send(&self, request: reqwest::blocking::RequestBuilder) -> YardResult<reqwest::blocking::Response> {
    let response = request
      .header("Accept", "application/vnd.github+json")
      .header("User-Agent", USER_AGENT)
      .header("X-GitHub-Api-Version", "2022-11-28")
      .bearer_auth(&self.token)
      .send()?;

    let status = response.status();
    if !status.is_success() {
      let message = response
        .text()
        .unwrap_or_else(|_| "unable to read response body".to_string());
      return Err(YardError::Host(HostError::Api {
        status: status.as_u16(),
        message: excerpt(&message),
      }));
    }

    Ok(response)
  }
}

impl HostClient for GitHubClient {
  fn find_open_pull_request(&self, head: &str, base: &str) -> YardResult<Option<PullRequest>> {
    let qualified_head = format!("{}:{}", self.owner()?, head);
    let request = self.http.get(self.url("/pulls")?).query(&[
      ("state", "open"),
      ("head", qualified_head.as_str()),
      ("base", base),
    ]);

    let pulls: Vec<PullRequest> = self.send(request)?.json()?;
    Ok(pulls.into_iter().next())
  }

  fn create_pull_request(&self, title: &str, body: &str, head: &str, base: &str) -> YardResult<PullRequest> {
    let request = self.http.post(self.url("/pulls")?).json(&serde_json::json!({
      "title": title,
      "body": body,
      "head": head,
      "base": base,
    }));

    Ok(self.send(request)?.json()?)
  }

  fn update_pull_request(&self, number: u64, title: &str, body: &str) -> YardResult<()> {
    let request = self
      .http
      .patch(self.url(&format!("/pulls/{}", number))?)
      .json(&serde_json::json!({
        "title": title,
        "body": body,
      }));

    self.send(request)?;
    Ok(())
  }

  fn create_release(&self, release: &NewRelease) -> YardResult<()> {
    let request = self.http.post(self.url("/releases")?).json(release);
    self.send(request)?;
    Ok(())
  }
}

/// Trim an error body down to something log-friendly
fn excerpt(body: &str) -> String {
  let trimmed = body.trim();
  match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
    Some((idx, _)) => format!("{}…", &trimmed[..idx]),
    None => trimmed.to_string(),
  }
}
