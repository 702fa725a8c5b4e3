use std::collections::BTreeSet;

use crate::ext::serde_json::JsonFetch;
use crate::github::api::GithubApi;
use crate::qualify::{TopicError, TopicLookup};

/// Topic Fetcher backed by the repository topics endpoint.
pub struct ApiTopics<'a> {
  api: &'a dyn GithubApi,
}

impl<'a> ApiTopics<'a> {
  pub fn new(api: &'a dyn GithubApi) -> Self {
    Self { api }
  }
}

impl TopicLookup for ApiTopics<'_> {
  fn topics(&self, repository: &str) -> Result<BTreeSet<String>, TopicError> {
    let body = self.api.repo_topics_json(repository)?;

    match body.fetch("names").to::<Vec<String>>() {
      Some(names) => Ok(names.into_iter().collect()),
      None => Err(TopicError::Missing {
        repository: repository.to_string(),
        message: body
          .fetch("message")
          .to::<String>()
          .unwrap_or_else(|| "response has no `names`".to_string()),
      }),
    }
  }
}
