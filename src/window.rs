use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

// Event calendar: everything here is derived from an injected "now".

/// Month the event runs in.
pub const EVENT_MONTH: u32 = 10;

/// First day of the event month on which repository opt-in is required.
pub const CUTOFF_DAY: u32 = 3;

/// Months in which the stats commands are available.
pub const SEASON_MONTHS: [u32; 3] = [9, 10, 11];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EventWindow {
  year: i32,
  cutoff: DateTime<Utc>,
}

impl EventWindow {
  pub fn for_year(year: i32) -> Result<Self> {
    let cutoff = NaiveDate::from_ymd_opt(year, EVENT_MONTH, CUTOFF_DAY)
      .and_then(|d| d.and_hms_opt(0, 0, 0))
      .map(|ndt| Utc.from_utc_datetime(&ndt))
      .with_context(|| format!("event year {} is out of range", year))?;

    Ok(Self { year, cutoff })
  }

  /// The event of the calendar year `now` falls in.
  pub fn for_now(now: DateTime<Utc>) -> Result<Self> {
    Self::for_year(now.year())
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  /// `<year>-10-03T00:00:00Z`; pull requests created before it count without repository opt-in.
  pub fn cutoff(&self) -> DateTime<Utc> {
    self.cutoff
  }

  /// `created:` qualifier for the search API covering October in every timezone
  /// (UTC+14 start through UTC-11 end). The `+` is pre-encoded for the query string.
  pub fn search_date_range(&self) -> String {
    let y = self.year;
    format!(
      "{y:04}-{m:02}-01T00:00:00%2B14:00..{y:04}-{n:02}-01T00:00:00-11:00",
      m = EVENT_MONTH,
      n = EVENT_MONTH + 1
    )
  }
}

/// Whether the stats commands are open at `now`.
pub fn in_season(now: DateTime<Utc>) -> bool {
  SEASON_MONTHS.contains(&now.month())
}

/// Parse a `--now-override` string into a UTC DateTime.
/// Accepts RFC3339 (e.g. 2025-10-15T12:00:00Z) or a naive timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`, read as UTC.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Utc))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .map(|ndt| Utc.from_utc_datetime(&ndt))
      })
  })
}

/// Returns the effective "now" given an optional override.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}
