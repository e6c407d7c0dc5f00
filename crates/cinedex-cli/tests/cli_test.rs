#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedex");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("movies"))
        .stdout(predicate::str::contains("search"));
}

#[test]
fn test_movies_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedex");
    cmd.args(["movies", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--category"));
}

#[test]
fn test_tv_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedex");
    cmd.args(["tv", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--category"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedex");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_empty_query_is_rejected_without_a_request() {
    // Arrange: no API key anywhere — validation must trip first
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("cinedex");

    // Act & Assert
    cmd.env_remove("TMDB_API_KEY")
        .args(["--dir", dir.path().to_str().unwrap(), "search", "--query", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Movie/TV show name is required"));
}

#[test]
fn test_search_invalid_kind() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedex");
    cmd.args(["search", "--query", "James Bond", "--kind", "anime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_movies_without_api_key_fails_at_startup() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("cinedex");

    // Act & Assert
    cmd.env_remove("TMDB_API_KEY")
        .args(["--dir", dir.path().to_str().unwrap(), "movies"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key is required"));
}
