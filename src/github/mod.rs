// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for GitHub integrations (API seam, issue search, repository topics)
// role: github/namespace
// outputs: Public submodules used by the stats pipeline
// invariants: Network access stays behind the GithubApi trait so fixtures can replace it
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod search;
pub mod topics;
