// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub REST seam used by the search and topic fetchers (token discovery, HTTP calls, fixtures)
// role: github/api
// inputs: env GITHUB_TOKEN / GH_TOKEN; optional `gh` CLI for token fallback; fixture env vars in tests
// outputs: Decoded JSON bodies for issue search and repository topics
// side_effects: Network calls to api.github.com; spawns `gh` subprocess when needed
// invariants:
// - Never panic; transport and decode failures surface as ApiError
// - Error statuses (4xx/5xx) still yield their JSON body so callers can read GitHub's `message`
// - Responses are memoized per run only (GithubCachedApi lives for one invocation)
// errors: ApiError::{Transport, Decode}; interpretation is left to callers
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

pub const API_ROOT: &str = "https://api.github.com";

const USER_AGENT: &str = "hacktober-stats";
const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_TOPICS: &str = "application/vnd.github.mercy-preview+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixture for the issue search response (whole body).
pub const ENV_SEARCH_FIXTURE: &str = "HACKSTATS_TEST_SEARCH_JSON";
/// Fixture for topic responses: an object keyed by `owner/name`, each value a whole body.
pub const ENV_TOPICS_FIXTURE: &str = "HACKSTATS_TEST_TOPICS_JSON";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },
  #[error("response from {url} is not valid JSON: {message}")]
  Decode { url: String, message: String },
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(t) = std::env::var(var) {
      if !t.trim().is_empty() {
        return Some(t);
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

fn get_json(agent: &ureq::Agent, url: &str, accept: &str, token: Option<&str>) -> Result<Value, ApiError> {
  let mut req = agent
    .get(url)
    .set("Accept", accept)
    .set("User-Agent", USER_AGENT);

  if let Some(t) = token {
    req = req.set("Authorization", &format!("Bearer {}", t));
  }

  let resp = match req.call() {
    Ok(r) => r,
    Err(ureq::Error::Status(code, r)) => {
      debug!(url, code, "GitHub answered with an error status");
      r
    }
    Err(err) => {
      return Err(ApiError::Transport {
        url: url.to_string(),
        message: err.to_string(),
      })
    }
  };

  resp.into_json::<Value>().map_err(|err| ApiError::Decode {
    url: url.to_string(),
    message: err.to_string(),
  })
}

// --- Trait seam for GitHub API ---
pub trait GithubApi {
  /// `GET /search/issues?q=<query>&per_page=<n>`; `query` must already be URL-safe.
  fn search_issues_json(&self, query: &str, per_page: u32) -> Result<Value, ApiError>;
  /// `GET /repos/<owner>/<name>/topics`
  fn repo_topics_json(&self, repository: &str) -> Result<Value, ApiError>;
}

// --- Lightweight in-memory caching wrapper ---
// Avoids repeat topic requests when several pull requests target one repository.
struct GithubCachedApi {
  inner: Box<dyn GithubApi>,
  search_json: RefCell<HashMap<String, Result<Value, ApiError>>>,
  topics_json: RefCell<HashMap<String, Result<Value, ApiError>>>,
}

impl GithubCachedApi {
  fn new(inner: Box<dyn GithubApi>) -> Self {
    Self {
      inner,
      search_json: RefCell::new(HashMap::new()),
      topics_json: RefCell::new(HashMap::new()),
    }
  }
}

impl GithubApi for GithubCachedApi {
  fn search_issues_json(&self, query: &str, per_page: u32) -> Result<Value, ApiError> {
    let key = format!("{}&per_page={}", query, per_page);

    if let Some(v) = self.search_json.borrow().get(&key).cloned() {
      return v;
    }
    let v = self.inner.search_issues_json(query, per_page);
    self.search_json.borrow_mut().insert(key, v.clone());

    v
  }

  fn repo_topics_json(&self, repository: &str) -> Result<Value, ApiError> {
    if let Some(v) = self.topics_json.borrow().get(repository).cloned() {
      return v;
    }
    let v = self.inner.repo_topics_json(repository);
    self.topics_json.borrow_mut().insert(repository.to_string(), v.clone());

    v
  }
}

struct GithubHttpApi {
  agent: ureq::Agent,
  base_url: String,
  token: Option<String>,
}

impl GithubHttpApi {
  fn new(token: Option<String>) -> Self {
    Self::with_base_url(API_ROOT, token)
  }

  fn with_base_url(base_url: &str, token: Option<String>) -> Self {
    let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();

    Self {
      agent,
      base_url: base_url.trim_end_matches('/').to_string(),
      token,
    }
  }
}

impl GithubApi for GithubHttpApi {
  fn search_issues_json(&self, query: &str, per_page: u32) -> Result<Value, ApiError> {
    let url = format!("{}/search/issues?q={}&per_page={}", self.base_url, query, per_page);
    debug!(url = %url, "GitHub search URL generated");
    get_json(&self.agent, &url, ACCEPT_JSON, self.token.as_deref())
  }

  fn repo_topics_json(&self, repository: &str) -> Result<Value, ApiError> {
    let url = format!("{}/repos/{}/topics", self.base_url, repository);
    get_json(&self.agent, &url, ACCEPT_TOPICS, self.token.as_deref())
  }
}

struct GithubEnvApi;

impl GithubEnvApi {
  fn parse_fixture(var: &str, raw: &str) -> Result<Value, ApiError> {
    serde_json::from_str::<Value>(raw).map_err(|err| ApiError::Decode {
      url: format!("env:{}", var),
      message: err.to_string(),
    })
  }
}

impl GithubApi for GithubEnvApi {
  fn search_issues_json(&self, _query: &str, _per_page: u32) -> Result<Value, ApiError> {
    match std::env::var(ENV_SEARCH_FIXTURE) {
      Ok(s) => Self::parse_fixture(ENV_SEARCH_FIXTURE, &s),
      Err(_) => Ok(json!({ "total_count": 0, "incomplete_results": false, "items": [] })),
    }
  }

  fn repo_topics_json(&self, repository: &str) -> Result<Value, ApiError> {
    let not_found = json!({ "message": "Not Found" });

    let Ok(s) = std::env::var(ENV_TOPICS_FIXTURE) else {
      return Ok(not_found);
    };
    let map = Self::parse_fixture(ENV_TOPICS_FIXTURE, &s)?;

    // Keys are looked up verbatim; repository names may contain dots.
    match map.get(repository) {
      Some(body) => Ok(body.clone()),
      None => Ok(not_found),
    }
  }
}

fn env_wants_mock() -> bool {
  std::env::var(ENV_SEARCH_FIXTURE).is_ok() || std::env::var(ENV_TOPICS_FIXTURE).is_ok()
}

fn build_api(token: Option<String>) -> Box<dyn GithubApi> {
  let inner: Box<dyn GithubApi> = if env_wants_mock() {
    Box::new(GithubEnvApi)
  } else {
    Box::new(GithubHttpApi::new(token))
  };

  Box::new(GithubCachedApi::new(inner))
}

/// API used by the CLI: fixture-backed when the test env vars are present, HTTP otherwise.
/// Requests go out unauthenticated when no token is available.
pub fn make_default_api(token: Option<String>) -> Box<dyn GithubApi> {
  build_api(token)
}

// Public constructors for dependency injection in higher layers/tests.
#[cfg(any(test, feature = "testutil"))]
pub fn make_env_api() -> Box<dyn GithubApi> {
  Box::new(GithubCachedApi::new(Box::new(GithubEnvApi)))
}

#[cfg(any(test, feature = "testutil"))]
pub fn make_http_api(base_url: &str, token: Option<String>) -> Box<dyn GithubApi> {
  Box::new(GithubCachedApi::new(Box::new(GithubHttpApi::with_base_url(base_url, token))))
}
