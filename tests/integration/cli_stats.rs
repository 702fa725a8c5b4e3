use predicates::prelude::*;
use serde_json::{json, Value};
use test_support::{init_insta, read_fixture_text, search_body, search_item, stats_cmd};

const NOW: &str = "2024-10-20T12:00:00Z";

/// Two grace-period PRs, one on a tagged repo, one on an untagged repo and one whose topics 404.
fn mixed_search() -> String {
  search_body(&[
    search_item("a/one", "2024-10-01T09:00:00Z"),
    search_item("a/one", "2024-10-05T10:00:00Z"),
    search_item("b/two", "2024-10-06T10:00:00Z"),
    search_item("c/three", "2024-10-07T10:00:00Z"),
    search_item("d/four", "2024-10-02T23:59:59Z"),
  ])
  .to_string()
}

fn mixed_topics() -> String {
  json!({
    "a/one": { "names": ["rust", "hacktoberfest"] },
    "b/two": { "names": ["rust"] }
  })
  .to_string()
}

#[test]
fn text_stats_for_explicit_username() {
  let out = stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", mixed_search())
    .env("HACKSTATS_TEST_TOPICS_JSON", mixed_topics())
    .args(["stats", "octocat"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let text = String::from_utf8(out.stdout).unwrap();
  assert_eq!(
    text,
    "Here are some stats!\n\n\
     octocat's Hacktoberfest (https://hacktoberfest.digitalocean.com)\n\
     octocat has made 3 contributions in October\n\n\
     **octocat is 1 PR away from a T-shirt or a tree!**\n\n\
     Top 5 Repositories:\n\
     2 contributions to [a/one](https://www.github.com/a/one)\n\
     1 contribution to [d/four](https://www.github.com/d/four)\n"
  );
}

#[test]
fn json_stats_card() {
  let out = stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", mixed_search())
    .env("HACKSTATS_TEST_TOPICS_JSON", mixed_topics())
    .args(["--format", "json", "stats", "octocat"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["total_count"], 3);
  assert_eq!(v["shirt"]["status"], "one_away");
  assert_eq!(v["top_repositories"][0]["repository"], "a/one");
  assert_eq!(v["top_repositories"][0]["count"], 2);
  assert_eq!(v["top_repositories"][1]["repository"], "d/four");
  assert_eq!(v["top_repositories"].as_array().unwrap().len(), 2);
}

#[test]
fn top_repositories_capped_at_five() {
  let items: Vec<Value> = ["r/1", "r/2", "r/3", "r/4", "r/5", "r/6", "r/2"]
    .iter()
    .map(|r| search_item(r, "2024-10-01T00:00:00Z"))
    .collect();

  let out = stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", search_body(&items).to_string())
    .args(["--format", "json", "stats", "octocat"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["total_count"], 7);
  assert_eq!(v["shirt"]["status"], "earned");

  let names: Vec<&str> = v["top_repositories"]
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["repository"].as_str().unwrap())
    .collect();
  assert_eq!(names, ["r/2", "r/1", "r/3", "r/4", "r/5"]);
}

#[test]
fn no_contributions_is_a_clean_exit() {
  stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", search_body(&[]).to_string())
    .args(["stats", "octocat"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No valid October GitHub contributions found for 'octocat'"));
}

#[test]
fn all_candidates_rejected_is_no_contributions() {
  let body = search_body(&[search_item("b/two", "2024-10-10T00:00:00Z")]).to_string();

  stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", body)
    .env("HACKSTATS_TEST_TOPICS_JSON", mixed_topics())
    .args(["--format", "json", "stats", "octocat"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"outcome\": \"no_qualifying_contributions\""));
}

#[test]
fn unknown_user_exits_2() {
  stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", read_fixture_text("search_user_not_found.json"))
    .args(["stats", "no-such-user-xyz"])
    .assert()
    .code(2)
    .stdout(predicate::str::contains("No GitHub user named 'no-such-user-xyz' could be found"));
}

#[test]
fn unknown_user_json_snapshot() {
  init_insta();
  let out = stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", read_fixture_text("search_user_not_found.json"))
    .args(["--format", "json", "stats", "ghost"])
    .output()
    .unwrap();

  assert_eq!(out.status.code(), Some(2));
  let v: Value = serde_json::from_slice(&out.stdout).unwrap();
  insta::with_settings!({ sort_maps => true }, {
    insta::assert_json_snapshot!(v, @r###"
    {
      "message": "No GitHub user named 'ghost' could be found (the user may not exist or may be hidden)",
      "outcome": "user_not_found",
      "username": "ghost"
    }
    "###);
  });
}

#[test]
fn api_failure_exits_1() {
  let body = json!({ "message": "API rate limit exceeded for 127.0.0.1." });

  stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", body.to_string())
    .args(["--format", "json", "stats", "octocat"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("\"outcome\": \"fetch_failure\""));
}

#[test]
fn missing_username_and_identity_is_a_usage_error() {
  stats_cmd(NOW)
    .env("HACKSTATS_TEST_SEARCH_JSON", search_body(&[]).to_string())
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Provide a GitHub username"));
}

#[test]
fn malformed_username_is_rejected_before_searching() {
  // Full-history results would be counted if the query were cut short.
  let all_time = search_body(&[search_item("a/one", "2019-10-01T00:00:00Z")]).to_string();

  for name in ["octo#x", "octo&per_page=1", "octo cat"] {
    stats_cmd(NOW)
      .env("HACKSTATS_TEST_SEARCH_JSON", &all_time)
      .args(["stats", name])
      .assert()
      .code(1)
      .stdout(predicate::str::is_empty())
      .stderr(predicate::str::contains("not a valid GitHub username"));
  }
}
