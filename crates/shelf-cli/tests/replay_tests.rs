//! Replaying script files end to end through the CLI library

use std::io::Write;

use shelf::config::Config;
use shelf::index::TagQuery;
use shelf::{Relevance, Tier};
use shelf_cli::commands::replay_script;

const SCRIPT: &str = r#"
[[step]]
op = "feed"
source = "user"
content = "Fix the failing login test"
tier = "pinned"

[[step]]
op = "feed"
source = "src/auth.rs"
content = "fn login(user: &str) -> bool { todo!() }"
tier = "warm"

[[step]]
op = "feed"
source = "test_output"
content = "assertion failed: login(\"bob\")"
tier = "scratch"

[[step]]
op = "retrieve"
tier = "warm"

[[step]]
op = "promote"
source = "src/auth.rs"
tier = "hot"
"#;

fn write_script(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("session.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_replay_builds_shelf_and_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(&dir, SCRIPT);

    let (session, log) = replay_script(&path, &Config::default()).unwrap();

    assert_eq!(log.applied, 5);
    assert!(log.rejected.is_empty());
    assert_eq!(session.shelf().len(), 3);
    assert_eq!(session.index().len(), 3);

    let snapshot = session.shelf().snapshot();
    assert_eq!(snapshot.tier(Tier::Hot).count, 1);
    assert_eq!(snapshot.tier(Tier::Warm).count, 0);
}

#[test]
fn test_replayed_index_answers_queries() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(&dir, SCRIPT);

    let (session, _log) = replay_script(&path, &Config::default()).unwrap();

    let critical: Vec<_> = session
        .index()
        .query(&TagQuery::new().relevance(Relevance::Critical))
        .into_iter()
        .map(|i| i.source.as_str())
        .collect();
    assert_eq!(critical, vec!["user", "test_output"]);
    assert_eq!(session.index().by_source("src/auth.rs").len(), 1);
}

#[test]
fn test_replay_respects_configured_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(&dir, SCRIPT);
    let mut config = Config::default();
    config.shelf.capacity = 12;

    let (session, log) = replay_script(&path, &config).unwrap();

    assert!(session.shelf().used() <= 12);
    assert!(!log.rejected.is_empty() || log.auto_compressions > 0);
}

#[test]
fn test_missing_script_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = replay_script(&dir.path().join("nope.toml"), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("Failed to read script"));
}
