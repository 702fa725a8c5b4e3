use predicates::prelude::*;
use serde_json::Value;
use test_support::{search_body, search_item, stats_cmd, tempdir};

const NOW: &str = "2024-10-20T12:00:00Z";

#[test]
fn link_stats_unlink_round_trip() {
  let td = tempdir();
  let links = td.path().join("state").join("links.json");
  let links_arg = links.to_str().unwrap();

  stats_cmd(NOW)
    .args(["--identity", "me#0001", "--links-file", links_arg, "link", "octocat"])
    .assert()
    .success()
    .stdout("me#0001, your GitHub username has been added\n");

  let stored: Value = serde_json::from_slice(&std::fs::read(&links).unwrap()).unwrap();
  assert_eq!(stored["me#0001"]["github_username"], "octocat");
  assert_eq!(stored["me#0001"]["date_added"], "2024-10-20T12:00:00Z");

  // Bare invocation resolves the linked account.
  let body = search_body(&[search_item("a/one", "2024-10-01T00:00:00Z")]).to_string();
  stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", body)
    .env("HACKSTATS_IDENTITY", "me#0001")
    .env("HACKSTATS_LINKS_FILE", links_arg)
    .assert()
    .success()
    .stdout(predicate::str::contains("octocat has made 1 contribution in October"));

  stats_cmd(NOW)
    .args(["--identity", "me#0001", "--links-file", links_arg, "link", "hubot"])
    .assert()
    .success()
    .stdout("me#0001, your GitHub username has been updated to: 'hubot'\n");

  stats_cmd(NOW)
    .args(["--identity", "me#0001", "--links-file", links_arg, "unlink"])
    .assert()
    .success()
    .stdout("me#0001, your GitHub profile has been unlinked\n");

  stats_cmd(NOW)
    .args(["--identity", "me#0001", "--links-file", links_arg, "unlink"])
    .assert()
    .success()
    .stdout("me#0001, you do not currently have a linked GitHub account\n");

  let stored: Value = serde_json::from_slice(&std::fs::read(&links).unwrap()).unwrap();
  assert_eq!(stored, serde_json::json!({}));
}

#[test]
fn stats_without_link_prints_instructions() {
  let td = tempdir();
  let links = td.path().join("links.json");

  stats_cmd(NOW)
    .args(["--identity", "me", "--links-file", links.to_str().unwrap(), "stats"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("me, you have not linked a GitHub account"))
    .stdout(predicate::str::contains("hacktober-stats link <github_username>"));

  assert!(!links.exists());
}

#[test]
fn link_without_username_leaves_file_untouched() {
  let td = tempdir();
  let links = td.path().join("links.json");

  stats_cmd(NOW)
    .args(["--identity", "me", "--links-file", links.to_str().unwrap(), "link"])
    .assert()
    .code(1)
    .stdout("me, a GitHub username is required to link your account\n");

  assert!(!links.exists());
}

#[test]
fn legacy_date_format_still_loads() {
  let td = tempdir();
  let links = td.path().join("links.json");
  std::fs::write(
    &links,
    r#"{ "42": { "github_username": "octocat", "date_added": "2020-10-02 08:15:00.123456" } }"#,
  )
  .unwrap();

  stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", search_body(&[]).to_string())
    .args(["--identity", "42", "--links-file", links.to_str().unwrap()])
    .assert()
    .success()
    .stdout(predicate::str::contains("for 'octocat'"));
}

#[test]
fn link_requires_identity() {
  let td = tempdir();

  stats_cmd(NOW)
    .args(["--links-file", td.path().join("l.json").to_str().unwrap(), "unlink"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("--identity"));
}
