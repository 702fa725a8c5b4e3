// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one invocation: season gate, username resolution, stats pipeline, link store updates
// role: processing/orchestrator
// inputs: EffectiveConfig; GithubApi (stats only); links file
// outputs: Reply text or JSON on the given writer; process exit status
// side_effects: Reads/writes the links file; network via GithubApi
// invariants:
// - Outside September–November nothing runs unless --any-month
// - link/unlink persist immediately
// - Exit status: 0 stats or no contributions; 2 unknown GitHub user; 1 fetch failure or unresolvable username
// errors: IO/config errors propagate (anyhow); stats outcomes are rendered, not raised
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::cli::{Command, EffectiveConfig, OutputFormat};
use crate::github::api::{self as ghapi, GithubApi};
use crate::links::{LinkChange, LinkStore};
use crate::pipeline::{compute_contribution_summary, StatsError};
use crate::render;
use crate::window::{self, EventWindow};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USER_NOT_FOUND: u8 = 2;

const BIN_NAME: &str = env!("CARGO_PKG_NAME");

pub fn run(cfg: &EffectiveConfig, out: &mut dyn Write) -> Result<u8> {
  let now = window::effective_now(cfg.now);

  if !cfg.any_month && !window::in_season(now) {
    bail!("Hacktoberfest stats are only available in September, October and November (use --any-month to override)");
  }

  match &cfg.command {
    Command::Stats { username } => {
      let api = ghapi::make_default_api(ghapi::get_github_token());
      run_stats(cfg, now, username.as_deref(), api.as_ref(), out)
    }
    Command::Link { username } => run_link(cfg, now, username.as_deref(), out),
    Command::Unlink => run_unlink(cfg, out),
  }
}

fn identity(cfg: &EffectiveConfig) -> Result<&str> {
  cfg.identity.as_deref().context("an identity is required for linked accounts")
}

pub fn run_stats(
  cfg: &EffectiveConfig,
  now: DateTime<Utc>,
  username: Option<&str>,
  api: &dyn GithubApi,
  out: &mut dyn Write,
) -> Result<u8> {
  // Phase 1: resolve username, falling back to the identity's linked account
  let username = match username {
    Some(u) => u.to_string(),
    None => {
      let who = identity(cfg)?;
      let store = LinkStore::load(&cfg.links_file)?;

      match store.get(who) {
        Some(acct) => {
          info!("Getting stats for {} linked GitHub account '{}'", who, acct.github_username);
          acct.github_username.clone()
        }
        None => {
          writeln!(out, "{}", render::not_linked_message(who, BIN_NAME))?;
          return Ok(EXIT_FAILURE);
        }
      }
    }
  };

  // Phase 2: compute
  let window = EventWindow::for_now(now)?;
  let result = compute_contribution_summary(api, &username, &window);

  // Phase 3: render
  match result {
    Ok(summary) => {
      info!("Building Hacktoberfest card for GitHub user: '{}'", username);
      let card = render::build_card(&username, &summary);
      match cfg.format {
        OutputFormat::Text => write!(out, "{}", render::render_text(&card))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&card)?)?,
      }
      Ok(EXIT_OK)
    }
    Err(err) => {
      match cfg.format {
        OutputFormat::Text => writeln!(out, "{}", render::outcome_message(&err))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&render::outcome_report(&err))?)?,
      }
      Ok(match err {
        StatsError::NoQualifyingContributions { .. } => EXIT_OK,
        StatsError::UserNotFound { .. } => EXIT_USER_NOT_FOUND,
        StatsError::FetchFailure { .. } => EXIT_FAILURE,
      })
    }
  }
}

pub fn run_link(cfg: &EffectiveConfig, now: DateTime<Utc>, username: Option<&str>, out: &mut dyn Write) -> Result<u8> {
  let who = identity(cfg)?;

  let Some(username) = username else {
    info!("{} tried to link a GitHub account but didn't provide a username", who);
    writeln!(out, "{}", render::link_requires_username_message(who))?;
    return Ok(EXIT_FAILURE);
  };

  let mut store = LinkStore::load(&cfg.links_file)?;
  let change = store.link(who, username, now);
  store.save()?;

  let updated = match change {
    LinkChange::Added => {
      info!("{} has added a github link to '{}'", who, username);
      false
    }
    LinkChange::Updated { previous } => {
      info!("{} has changed their github link from '{}' to '{}'", who, previous, username);
      true
    }
  };
  writeln!(out, "{}", render::linked_message(who, username, updated))?;

  Ok(EXIT_OK)
}

pub fn run_unlink(cfg: &EffectiveConfig, out: &mut dyn Write) -> Result<u8> {
  let who = identity(cfg)?;

  let mut store = LinkStore::load(&cfg.links_file)?;
  let removed = store.unlink(who);
  store.save()?;

  writeln!(out, "{}", render::unlinked_message(who, removed.is_some()))?;

  Ok(EXIT_OK)
}
