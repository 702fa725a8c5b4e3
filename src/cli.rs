use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::github::search::is_valid_login;
use crate::links::DEFAULT_LINKS_FILE;
use crate::window;

#[derive(Parser, Debug)]
#[command(
    name = "hacktober-stats",
    version,
    about = "Summarize a GitHub user's qualifying Hacktoberfest pull requests",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  /// Chat identity of the person running the command (used for linked accounts)
  #[arg(long, global = true, env = "HACKSTATS_IDENTITY")]
  pub identity: Option<String>,

  /// JSON file holding identity → GitHub username links
  #[arg(long, global = true, env = "HACKSTATS_LINKS_FILE", default_value = DEFAULT_LINKS_FILE)]
  pub links_file: PathBuf,

  /// Output format for stats
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  pub format: OutputFormat,

  /// Allow commands outside September–November
  #[arg(long, global = true)]
  pub any_month: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used for the event year and season (hidden; tests only)
  #[arg(long = "now-override", global = true, hide = true)]
  pub now_override: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Show October stats for a GitHub user (defaults to your linked account)
  Stats {
    /// GitHub username to look up
    username: Option<String>,
  },
  /// Link your identity to a GitHub username
  Link {
    /// GitHub username to link
    username: Option<String>,
  },
  /// Remove your linked GitHub username
  Unlink,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  Text,
  Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
  pub command: Command,
  pub identity: Option<String>,
  pub links_file: PathBuf,
  pub format: OutputFormat,
  pub any_month: bool,
  pub now: Option<DateTime<Utc>>,
}

fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Bare invocation means "my stats"
  let command = match cli.command.unwrap_or(Command::Stats { username: None }) {
    Command::Stats { username } => Command::Stats { username: non_blank(username) },
    Command::Link { username } => Command::Link { username: non_blank(username) },
    Command::Unlink => Command::Unlink,
  };
  let identity = non_blank(cli.identity);

  if let Command::Stats { username: Some(u) } | Command::Link { username: Some(u) } = &command {
    if !is_valid_login(u) {
      bail!("'{}' is not a valid GitHub username", u);
    }
  }

  let needs_identity = match &command {
    Command::Stats { username } => username.is_none(),
    Command::Link { .. } | Command::Unlink => true,
  };

  if needs_identity && identity.is_none() {
    match command {
      Command::Stats { .. } => bail!("Provide a GitHub username, or --identity (HACKSTATS_IDENTITY) to use your linked account"),
      _ => bail!("Linking accounts requires --identity (or HACKSTATS_IDENTITY)"),
    }
  }

  let now = match cli.now_override.as_deref() {
    None => None,
    Some(raw) => match window::parse_now_override(Some(raw)) {
      Some(dt) => Some(dt),
      None => bail!("invalid --now-override '{}', expected RFC3339 or YYYY-MM-DDTHH:MM:SS", raw),
    },
  };

  Ok(EffectiveConfig {
    command,
    identity,
    links_file: cli.links_file,
    format: cli.format,
    any_month: cli.any_month,
    now,
  })
}
