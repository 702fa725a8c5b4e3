// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Persist the chat-identity → GitHub username links used when no username is given
// role: storage/links
// inputs: JSON file path; identity strings; usernames
// outputs: LinkStore with lookup/link/unlink; JSON file on save
// side_effects: Reads/writes the links file; creates its parent directory
// invariants:
// - Missing file loads as an empty store
// - One entry per identity; re-linking replaces the username and date
// - date_added is written as RFC3339; legacy "YYYY-MM-DD HH:MM:SS[.ffffff]" values still load
// errors: IO and JSON errors bubble with the file path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_LINKS_FILE: &str = "github_links.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
  pub github_username: String,
  #[serde(with = "date_added")]
  pub date_added: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkChange {
  Added,
  Updated { previous: String },
}

#[derive(Debug)]
pub struct LinkStore {
  path: PathBuf,
  accounts: BTreeMap<String, LinkedAccount>,
}

impl LinkStore {
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
      info!("Linked account log: '{}' does not exist", path.display());
      return Ok(Self { path, accounts: BTreeMap::new() });
    }

    info!("Loading linked GitHub accounts from '{}'", path.display());
    let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let accounts: BTreeMap<String, LinkedAccount> =
      serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    info!("Loaded {} linked GitHub accounts from '{}'", accounts.len(), path.display());

    Ok(Self { path, accounts })
  }

  pub fn save(&self) -> Result<()> {
    info!("Saving {} linked accounts to '{}'", self.len(), self.path.display());

    if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
      std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let data = serde_json::to_vec_pretty(&self.accounts)?;
    std::fs::write(&self.path, data).with_context(|| format!("writing {}", self.path.display()))?;

    Ok(())
  }

  pub fn len(&self) -> usize {
    self.accounts.len()
  }

  pub fn get(&self, identity: &str) -> Option<&LinkedAccount> {
    self.accounts.get(identity)
  }

  pub fn link(&mut self, identity: &str, github_username: &str, now: DateTime<Utc>) -> LinkChange {
    let account = LinkedAccount {
      github_username: github_username.to_string(),
      date_added: now,
    };

    match self.accounts.insert(identity.to_string(), account) {
      Some(old) => LinkChange::Updated { previous: old.github_username },
      None => LinkChange::Added,
    }
  }

  pub fn unlink(&mut self, identity: &str) -> Option<LinkedAccount> {
    let removed = self.accounts.remove(identity);

    match &removed {
      Some(_) => info!("{} has unlinked their GitHub account", identity),
      None => info!("{} tried to unlink their GitHub account but no account was linked", identity),
    }

    removed
  }
}

mod date_added {
  use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
  use serde::{Deserialize, Deserializer, Serializer};

  const LEGACY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

  pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;

    DateTime::parse_from_rfc3339(&raw)
      .map(|dt| dt.with_timezone(&Utc))
      .or_else(|_| NaiveDateTime::parse_from_str(&raw, LEGACY_FORMAT).map(|ndt| Utc.from_utc_datetime(&ndt)))
      .map_err(|_| serde::de::Error::custom(format!("unrecognized date_added: {}", raw)))
  }
}
