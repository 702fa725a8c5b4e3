use jsonschema::validator_for;
use serde_json::json;
use test_support::{search_body, search_item, stats_cmd};

const NOW: &str = "2024-10-20T12:00:00Z";

fn read_schema(name: &str) -> serde_json::Value {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  serde_json::from_slice(&data).expect("valid schema JSON")
}

fn compile_schema(name: &str) -> jsonschema::Validator {
  let schema = read_schema(name);
  validator_for(&schema).expect("compile schema")
}

fn json_stats(search: serde_json::Value, topics: Option<serde_json::Value>) -> serde_json::Value {
  let mut cmd = stats_cmd(NOW);
  cmd.env("HACKSTATS_TEST_SEARCH_JSON", search.to_string());
  if let Some(t) = topics {
    cmd.env("HACKSTATS_TEST_TOPICS_JSON", t.to_string());
  }

  let out = cmd.args(["--format", "json", "stats", "octocat"]).output().unwrap();
  serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

#[test]
fn stats_cards_conform_to_schema() {
  let compiled = compile_schema("stats-card.schema.json");

  let one = json_stats(search_body(&[search_item("a/one", "2024-10-01T00:00:00Z")]), None);
  compiled.validate(&one).expect("schema validation failed for a single PR");

  let items: Vec<_> = (0..6).map(|i| search_item(&format!("o/r{i}"), "2024-10-10T00:00:00Z")).collect();
  let topics: serde_json::Map<String, serde_json::Value> =
    (0..6).map(|i| (format!("o/r{i}"), json!({ "names": ["hacktoberfest"] }))).collect();
  let many = json_stats(search_body(&items), Some(topics.into()));
  compiled.validate(&many).expect("schema validation failed for six repositories");
  assert_eq!(many["top_repositories"].as_array().unwrap().len(), 5);
}

#[test]
fn outcomes_conform_to_schema() {
  let compiled = compile_schema("stats-outcome.schema.json");

  let empty = json_stats(search_body(&[]), None);
  compiled.validate(&empty).expect("schema validation failed for no contributions");

  let failed = json_stats(json!({ "message": "Bad credentials" }), None);
  compiled.validate(&failed).expect("schema validation failed for fetch failure");
  assert_eq!(failed["outcome"], "fetch_failure");
}
