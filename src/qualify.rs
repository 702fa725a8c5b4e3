// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decide which October pull requests count toward the event
// role: core/qualification
// inputs: PullRequestCandidate list in search order; TopicLookup capability; EventWindow cutoff
// outputs: Admitted candidates in input order
// side_effects: Topic lookups only for candidates created at/after the cutoff
// invariants:
// - created_at < cutoff ⇒ admitted, lookup not invoked
// - created_at >= cutoff ⇒ admitted iff repository topics contain EVENT_TOPIC
// - lookup error ⇒ rejected and logged; never aborts the run
// errors: None propagated
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::github::api::ApiError;
use crate::model::PullRequestCandidate;
use crate::window::EventWindow;

/// Repository topic that opts a repository into the event.
pub const EVENT_TOPIC: &str = "hacktoberfest";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
  #[error("no topics in response for {repository}: {message}")]
  Missing { repository: String, message: String },
  #[error(transparent)]
  Api(#[from] ApiError),
}

/// Topic tags of a repository, keyed by `owner/name`.
pub trait TopicLookup {
  fn topics(&self, repository: &str) -> Result<BTreeSet<String>, TopicError>;
}

impl<F> TopicLookup for F
where
  F: Fn(&str) -> Result<BTreeSet<String>, TopicError>,
{
  fn topics(&self, repository: &str) -> Result<BTreeSet<String>, TopicError> {
    self(repository)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qualifier {
  cutoff: DateTime<Utc>,
}

impl Qualifier {
  pub fn new(window: &EventWindow) -> Self {
    Self { cutoff: window.cutoff() }
  }

  pub fn cutoff(&self) -> DateTime<Utc> {
    self.cutoff
  }

  pub fn qualify(&self, candidate: &PullRequestCandidate, lookup: &dyn TopicLookup) -> bool {
    // Grace period: early pull requests count without repository opt-in.
    if candidate.created_at < self.cutoff {
      return true;
    }

    match lookup.topics(&candidate.repository) {
      Ok(topics) => {
        let tagged = topics.contains(EVENT_TOPIC);
        if !tagged {
          debug!(repository = %candidate.repository, "repository is not tagged '{}'", EVENT_TOPIC);
        }
        tagged
      }
      Err(err) => {
        warn!(
          repository = %candidate.repository,
          url = %candidate.repository_url(),
          error = %err,
          "error fetching topics; pull request not counted"
        );
        false
      }
    }
  }

  /// Filter candidates in order, keeping those that qualify.
  pub fn admit_all(&self, candidates: Vec<PullRequestCandidate>, lookup: &dyn TopicLookup) -> Vec<PullRequestCandidate> {
    candidates.into_iter().filter(|c| self.qualify(c, lookup)).collect()
  }
}
