use serde::Serialize;

use crate::model::{repository_url, ContributionSummary, GITHUB_WEB_ROOT};
use crate::pipeline::StatsError;
use crate::summary::{ShirtProgress, PRS_FOR_SHIRT};

pub const EVENT_NAME: &str = "Hacktoberfest";
pub const EVENT_URL: &str = "https://hacktoberfest.digitalocean.com";

/// "contribution" for exactly one, "contributions" otherwise.
pub fn contributionator(n: usize) -> &'static str {
    if n == 1 {
        "contribution"
    } else {
        "contributions"
    }
}

pub fn shirt_message(username: &str, progress: ShirtProgress) -> String {
    match progress {
        ShirtProgress::Earned => format!("**{} has earned a T-shirt or a tree!**", username),
        ShirtProgress::OneAway => format!("**{} is 1 PR away from a T-shirt or a tree!**", username),
        ShirtProgress::Away(n) => format!("**{} is {} PRs away from a T-shirt or a tree!**", username, n),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryLine {
    pub repository: String,
    pub url: String,
    pub count: usize,
}

/// Display-ready stats for one user, mirroring a chat embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsCard {
    pub username: String,
    pub title: String,
    pub description: String,
    pub total_count: usize,
    pub shirt_threshold: usize,
    pub shirt: ShirtProgress,
    pub shirt_message: String,
    pub thumbnail_url: String,
    pub event_url: String,
    pub top_repositories: Vec<RepositoryLine>,
}

pub fn build_card(username: &str, summary: &ContributionSummary) -> StatsCard {
    let n = summary.total_count;
    let shirt = ShirtProgress::classify(n);

    let top_repositories = summary
        .top_repositories
        .iter()
        .map(|r| RepositoryLine {
            repository: r.repository.clone(),
            url: repository_url(&r.repository),
            count: r.count,
        })
        .collect();

    StatsCard {
        username: username.to_string(),
        title: format!("{}'s {}", username, EVENT_NAME),
        description: format!("{} has made {} {} in October", username, n, contributionator(n)),
        total_count: n,
        shirt_threshold: PRS_FOR_SHIRT,
        shirt,
        shirt_message: shirt_message(username, shirt),
        thumbnail_url: format!("{}/{}.png", GITHUB_WEB_ROOT, username),
        event_url: EVENT_URL.to_string(),
        top_repositories,
    }
}

/// Lines of the form `n contribution(s) to [owner/name](url)`.
pub fn top_repositories_text(card: &StatsCard) -> String {
    card.top_repositories
        .iter()
        .map(|r| format!("{} {} to [{}]({})", r.count, contributionator(r.count), r.repository, r.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_text(card: &StatsCard) -> String {
    let mut out = String::new();
    out.push_str("Here are some stats!\n\n");
    out.push_str(&format!("{} ({})\n", card.title, card.event_url));
    out.push_str(&format!("{}\n\n", card.description));
    out.push_str(&format!("{}\n\n", card.shirt_message));
    out.push_str("Top 5 Repositories:\n");
    out.push_str(&top_repositories_text(card));
    out.push('\n');
    out
}

/// User-facing text for outcomes that produce no stats.
pub fn outcome_message(err: &StatsError) -> String {
    match err {
        StatsError::UserNotFound { username } => format!(
            "No GitHub user named '{}' could be found (the user may not exist or may be hidden)",
            username
        ),
        StatsError::FetchFailure { username, .. } => format!(
            "Something went wrong while fetching GitHub contributions for '{}', please try again later",
            username
        ),
        StatsError::NoQualifyingContributions { username } => {
            format!("No valid October GitHub contributions found for '{}'", username)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutcomeReport<'a> {
    pub outcome: &'static str,
    pub username: &'a str,
    pub message: String,
}

pub fn outcome_report(err: &StatsError) -> OutcomeReport<'_> {
    let (outcome, username) = match err {
        StatsError::UserNotFound { username } => ("user_not_found", username),
        StatsError::FetchFailure { username, .. } => ("fetch_failure", username),
        StatsError::NoQualifyingContributions { username } => ("no_qualifying_contributions", username),
    };

    OutcomeReport {
        outcome,
        username: username.as_str(),
        message: outcome_message(err),
    }
}

// --- Link store replies ---

pub fn not_linked_message(identity: &str, bin: &str) -> String {
    format!(
        "{identity}, you have not linked a GitHub account\n\n\
         You can link your GitHub account using:\n    {bin} link <github_username>\n\
         Or query GitHub stats directly using:\n    {bin} stats <github_username>"
    )
}

pub fn linked_message(identity: &str, username: &str, updated: bool) -> String {
    if updated {
        format!("{}, your GitHub username has been updated to: '{}'", identity, username)
    } else {
        format!("{}, your GitHub username has been added", identity)
    }
}

pub fn link_requires_username_message(identity: &str) -> String {
    format!("{}, a GitHub username is required to link your account", identity)
}

pub fn unlinked_message(identity: &str, had_link: bool) -> String {
    if had_link {
        format!("{}, your GitHub profile has been unlinked", identity)
    } else {
        format!("{}, you do not currently have a linked GitHub account", identity)
    }
}
