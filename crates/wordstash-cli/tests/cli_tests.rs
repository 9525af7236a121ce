//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn wordstash() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("wordstash").unwrap()
}

/// A command isolated to `dir`: its own database, home, and working directory.
fn isolated(dir: &TempDir, dictionary_url: &str) -> Command {
    let mut cmd = wordstash();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("WORDSTASH_DB", dir.path().join("wordstash.db"))
        .env("WORDSTASH_DICTIONARY_URL", dictionary_url)
        .env_remove("RUST_LOG");
    cmd
}

fn offline(dir: &TempDir) -> Command {
    isolated(dir, "http://127.0.0.1:1")
}

async fn dictionary(words: &[(&str, &str)]) -> MockServer {
    let server = MockServer::start().await;
    for (word, definition) in words {
        let body = serde_json::json!([{
            "word": word,
            "phonetic": format!("/{word}/"),
            "meanings": [{
                "partOfSpeech": "adjective",
                "definitions": [{"definition": definition, "example": format!("a {word} example")}],
                "synonyms": [],
                "antonyms": []
            }]
        }]);
        Mock::given(method("GET"))
            .and(path(format!("/{word}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;
    }
    server
}

#[test]
fn init_writes_starter_config() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created wordstash.toml"));
    assert!(dir.path().join("wordstash.toml").exists());

    offline(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn streak_on_empty_database_fails() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .arg("streak")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no words in the database yet"));
}

#[test]
fn stats_on_empty_database() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Words:     0"));
}

#[test]
fn status_on_unknown_word_fails() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["mastered", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'ghost' has never been looked up"));
}

#[test]
fn clear_requires_yes() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    offline(&dir)
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 0 lookup(s)"));
}

#[test]
fn import_collections_from_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("mine.json");
    std::fs::write(&file, r#"{"kitchen": ["whisk", "Ladle"]}"#).unwrap();

    offline(&dir)
        .arg("import-collections")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 new collection entries"))
        .stdout(predicate::str::contains("kitchen"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["--config", "nope.toml", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn unreachable_dictionary_records_nothing() {
    let dir = TempDir::new().unwrap();
    offline(&dir)
        .args(["define", "serene"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not reachable"));
    offline(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lookups:   0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn define_then_change_status() {
    let server = dictionary(&[("serene", "Calm and peaceful.")]).await;
    let dir = TempDir::new().unwrap();
    let url = server.uri();

    isolated(&dir, &url)
        .args(["define", "Serene", "--tag", "calm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/serene/"))
        .stdout(predicate::str::contains("1. Calm and peaceful."))
        .stdout(predicate::str::contains("[tag: calm]"));

    isolated(&dir, &url)
        .args(["learning", "serene"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'serene' is now learning."));

    isolated(&dir, &url)
        .args(["mastered", "serene"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed learning status."));

    // Declining the demotion prompt leaves the word mastered.
    isolated(&dir, &url)
        .args(["learning", "serene"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Left 'serene' unchanged."));

    isolated(&dir, &url)
        .args(["history", "serene"])
        .assert()
        .success()
        .stdout(predicate::str::contains("looked up 1 time(s)"))
        .stdout(predicate::str::contains("serene (mastered) [tag: calm]"));

    isolated(&dir, &url)
        .arg("streak")
        .assert()
        .success()
        .stdout(predicate::str::contains("Longest streak: 1 day(s)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_word_is_reported() {
    let server = dictionary(&[]).await;
    let dir = TempDir::new().unwrap();
    isolated(&dir, &server.uri())
        .args(["define", "xyzzy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no definition found for 'xyzzy'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn quiz_needs_four_words_then_records_attempt() {
    let words = [
        ("abate", "To lessen in force."),
        ("lucid", "Clear and easy to understand."),
        ("laconic", "Using very few words."),
        ("venerate", "To regard with great respect."),
    ];
    let server = dictionary(&words).await;
    let dir = TempDir::new().unwrap();
    let url = server.uri();

    for (word, _) in &words[..3] {
        isolated(&dir, &url).args(["define", word]).assert().success();
    }
    isolated(&dir, &url)
        .arg("quiz")
        .assert()
        .failure()
        .stderr(predicate::str::contains("found 3, need at least 4"));

    isolated(&dir, &url).args(["define", "venerate"]).assert().success();

    isolated(&dir, &url)
        .arg("quiz")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing was recorded"));
    isolated(&dir, &url)
        .arg("attempts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No quiz attempts yet"));

    isolated(&dir, &url)
        .args(["quiz", "-n", "4"])
        .write_stdin("1\n2\n3\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 4/4"))
        .stdout(predicate::str::contains("Score: "));
    isolated(&dir, &url)
        .arg("attempts")
        .assert()
        .success()
        .stdout(predicate::str::contains("/4"))
        .stdout(predicate::str::contains("all"));
}

#[tokio::test(flavor = "multi_thread")]
async fn refresh_and_delete() {
    let server = dictionary(&[("lucid", "Clear.")]).await;
    let dir = TempDir::new().unwrap();
    let url = server.uri();

    isolated(&dir, &url).args(["define", "lucid"]).assert().success();
    isolated(&dir, &url)
        .args(["refresh", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Refreshed 1 definition(s)."));

    isolated(&dir, &url)
        .args(["delete", "lucid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 lookup(s) of 'lucid'."));
    isolated(&dir, &url)
        .args(["delete", "lucid"])
        .assert()
        .failure();
}
