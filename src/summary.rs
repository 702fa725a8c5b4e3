use std::collections::HashMap;

use serde::Serialize;

use crate::model::{ContributionSummary, PullRequestCandidate, RepositoryCount};

/// Number of repositories kept in the leaderboard.
pub const TOP_N: usize = 5;

/// Minimum number of qualifying pull requests for the event reward.
pub const PRS_FOR_SHIRT: usize = 4;

/// Count admitted pull requests per repository and keep the `TOP_N` largest.
///
/// Equal counts keep first-seen order. Repository identifiers are compared verbatim.
pub fn summarize(admitted: &[PullRequestCandidate]) -> ContributionSummary {
  let mut counts: Vec<RepositoryCount> = Vec::new();
  let mut slot: HashMap<&str, usize> = HashMap::new();

  for pr in admitted {
    match slot.get(pr.repository.as_str()) {
      Some(&i) => counts[i].count += 1,
      None => {
        slot.insert(pr.repository.as_str(), counts.len());
        counts.push(RepositoryCount {
          repository: pr.repository.clone(),
          count: 1,
        });
      }
    }
  }

  // stable: ties stay in first-seen order
  counts.sort_by(|a, b| b.count.cmp(&a.count));
  counts.truncate(TOP_N);

  ContributionSummary {
    total_count: admitted.len(),
    top_repositories: counts,
  }
}

/// Progress toward the event reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "remaining", rename_all = "snake_case")]
pub enum ShirtProgress {
  Earned,
  OneAway,
  Away(usize),
}

impl ShirtProgress {
  pub fn classify(total: usize) -> Self {
    Self::classify_with(total, PRS_FOR_SHIRT)
  }

  pub fn classify_with(total: usize, threshold: usize) -> Self {
    if total >= threshold {
      ShirtProgress::Earned
    } else if total + 1 == threshold {
      ShirtProgress::OneAway
    } else {
      ShirtProgress::Away(threshold - total)
    }
  }
}
