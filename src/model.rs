// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the candidate and summary types shared by qualification, aggregation and rendering
// role: model/types
// outputs: PullRequestCandidate (per-query, immutable) and serializable ContributionSummary
// invariants: top_repositories.len() <= 5; sum of top counts <= total_count; no cross-query caching
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GITHUB_WEB_ROOT: &str = "https://www.github.com";

/// Browser URL for an `owner/name` repository identifier.
pub fn repository_url(repository: &str) -> String {
  format!("{}/{}", GITHUB_WEB_ROOT, repository)
}

/// One search hit: a pull request authored by the queried user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCandidate {
  /// `owner/name`, exactly as GitHub reported it (no case folding)
  pub repository: String,
  pub created_at: DateTime<Utc>,
}

impl PullRequestCandidate {
  pub fn repository_url(&self) -> String {
    repository_url(&self.repository)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCount {
  pub repository: String,
  pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSummary {
  pub total_count: usize,
  pub top_repositories: Vec<RepositoryCount>,
}
