// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Query GitHub issue search for a user's October pull requests and map hits to candidates
// role: github/search
// inputs: GithubApi, username, EventWindow
// outputs: Vec<PullRequestCandidate> in search order, or SearchError
// side_effects: One search request per call
// invariants:
// - Query excludes invalid/spam labels and drafts, and keeps public PRs inside the October window
// - A single page (PER_PAGE) is requested; no pagination or retry
// - Malformed items are skipped with a warning; the rest of the page still counts
// errors: SearchError::UserNotFound for unknown/invisible users; SearchError::Failure otherwise
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::ext::serde_json::JsonFetch;
use crate::github::api::GithubApi;
use crate::model::PullRequestCandidate;
use crate::window::EventWindow;

/// GitHub caps search pages at 100 items.
pub const PER_PAGE: u32 = 100;

const EXCLUDED_LABELS: [&str; 2] = ["invalid", "spam"];

const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Validation message GitHub returns when `author:` names an unknown or hidden user.
pub const NONEXISTENT_USER_MESSAGE: &str = "The listed users cannot be searched either because the users do not exist \
   or you do not have permission to view the users.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
  #[error("no GitHub user found named '{0}'")]
  UserNotFound(String),
  #[error("GitHub search failed: {0}")]
  Failure(String),
}

/// Build the `q=` value (without the `q=` prefix) for a user's event pull requests.
pub fn build_query(username: &str, window: &EventWindow) -> String {
  let mut terms: Vec<String> = EXCLUDED_LABELS.iter().map(|l| format!("-label:{}", l)).collect();
  terms.push("type:pr".into());
  terms.push("is:public".into());
  terms.push(format!("author:{}", username));
  terms.push("-is:draft".into());
  terms.push(format!("created:{}", window.search_date_range()));
  terms.join("+")
}

/// GitHub login grammar: ASCII alphanumerics and single inner hyphens, at most 39 characters.
///
/// Anything else could not be a real account and would change the meaning of the query string.
pub fn is_valid_login(username: &str) -> bool {
  static RE_LOGIN: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"^[A-Za-z0-9](?:-?[A-Za-z0-9]){0,38}$").expect("static regex"));

  RE_LOGIN.is_match(username)
}

/// Extract `owner/name` from an `https://api.github.com/repos/<owner>/<name>` URL.
pub fn repository_shortname(api_url: &str) -> Option<String> {
  static RE_REPO: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^https?://api\.github\.com/repos/([\w.\-]+/[\w.\-]+)/?$").expect("static regex")
  });

  RE_REPO.captures(api_url).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(raw, CREATED_AT_FORMAT)
    .ok()
    .map(|ndt| Utc.from_utc_datetime(&ndt))
}

fn candidate_from_item(item: &Value) -> Option<PullRequestCandidate> {
  let repository_url = item.fetch("repository_url").to::<String>()?;
  let repository = repository_shortname(&repository_url)?;
  let created_at = parse_created_at(&item.fetch("created_at").to::<String>()?)?;

  Some(PullRequestCandidate { repository, created_at })
}

/// Interpret a search response body.
pub fn classify_response(username: &str, body: &Value) -> Result<Vec<PullRequestCandidate>, SearchError> {
  // Phase 1: API-level errors carry a top-level `message`
  if body.fetch("message").exists() {
    let message: String = body.fetch("message").to_or_default();
    let detail = body.fetch("errors.0.message").to::<String>().unwrap_or(message);

    if detail == NONEXISTENT_USER_MESSAGE {
      debug!("No GitHub user found named '{}'", username);
      return Err(SearchError::UserNotFound(username.to_string()));
    }

    error!("GitHub API request for '{}' failed with message: {}", username, detail);
    return Err(SearchError::Failure(detail));
  }

  // Phase 2: empty result short circuit
  match body.fetch("total_count").to::<u64>() {
    Some(0) => {
      info!("No Hacktoberfest PRs found for GitHub user: '{}'", username);
      return Ok(Vec::new());
    }
    Some(_) => {}
    None => {
      error!("GitHub search for '{}' returned no total_count", username);
      return Err(SearchError::Failure("search response has no total_count".into()));
    }
  }

  let Some(items) = body.fetch("items").as_array() else {
    error!("GitHub search for '{}' returned no items array", username);
    return Err(SearchError::Failure("search response has no items".into()));
  };

  // Phase 3: map items, skipping malformed ones
  let mut out = Vec::with_capacity(items.len());
  for item in items {
    match candidate_from_item(item) {
      Some(c) => out.push(c),
      None => warn!(
        item = %item.fetch("html_url").to::<String>().unwrap_or_default(),
        "skipping search item without a usable repository_url/created_at"
      ),
    }
  }

  info!("Found {} October PRs for GitHub user: '{}'", out.len(), username);
  Ok(out)
}

/// Search Fetcher: one bounded query for the user's pull requests in the event month.
pub fn fetch_october_prs(
  api: &dyn GithubApi,
  username: &str,
  window: &EventWindow,
) -> Result<Vec<PullRequestCandidate>, SearchError> {
  if !is_valid_login(username) {
    warn!("'{}' is not a valid GitHub login; no search made", username);
    return Err(SearchError::UserNotFound(username.to_string()));
  }

  info!("Generating Hacktoberfest PR query for GitHub user: '{}'", username);
  let query = build_query(username, window);

  let body = api.search_issues_json(&query, PER_PAGE).map_err(|err| {
    error!("GitHub API request for '{}' failed: {}", username, err);
    SearchError::Failure(err.to_string())
  })?;

  classify_response(username, &body)
}
