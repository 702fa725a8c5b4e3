use tracing::{debug, info};

use crate::github::api::GithubApi;
use crate::github::search::{self, SearchError};
use crate::github::topics::ApiTopics;
use crate::model::ContributionSummary;
use crate::qualify::Qualifier;
use crate::summary::summarize;
use crate::window::EventWindow;

/// Terminal outcomes of a stats run other than a summary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
  #[error("no GitHub user found named '{username}'")]
  UserNotFound { username: String },
  #[error("GitHub request for '{username}' failed: {message}")]
  FetchFailure { username: String, message: String },
  #[error("no qualifying October contributions found for '{username}'")]
  NoQualifyingContributions { username: String },
}

/// Search, qualify and aggregate one user's event pull requests.
///
/// One search request is made; a topic request follows for each candidate
/// created on or after the window's cutoff. Topic failures only drop that
/// candidate.
pub fn compute_contribution_summary(
  api: &dyn GithubApi,
  username: &str,
  window: &EventWindow,
) -> Result<ContributionSummary, StatsError> {
  let candidates = search::fetch_october_prs(api, username, window).map_err(|err| match err {
    SearchError::UserNotFound(_) => StatsError::UserNotFound {
      username: username.to_string(),
    },
    SearchError::Failure(message) => StatsError::FetchFailure {
      username: username.to_string(),
      message,
    },
  })?;

  let found = candidates.len();
  let qualifier = Qualifier::new(window);
  debug!(cutoff = %qualifier.cutoff(), "checking topics for pull requests created after the cutoff");

  let admitted = qualifier.admit_all(candidates, &ApiTopics::new(api));
  info!(
    "{} of {} October {} PRs qualify for GitHub user '{}'",
    admitted.len(),
    found,
    window.year(),
    username
  );

  if admitted.is_empty() {
    return Err(StatsError::NoQualifyingContributions {
      username: username.to_string(),
    });
  }

  Ok(summarize(&admitted))
}
