// domain-search/tests/cli_integration.rs
//
// These tests never reach a probe: every case fails or exits before any
// candidate is resolved, so they run without network access.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{NamedTempFile, TempDir};

/// Command isolated from the user's config files and DS_* variables.
fn domain_search(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-search").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "DS_CONFIG",
        "DS_CURRENCY",
        "DS_DEFAULT_EXTENSION",
        "DS_MAX_CANDIDATES",
        "DS_CONCURRENCY",
        "DS_TIMEOUT",
        "DS_RDAP_TIMEOUT",
        "DS_DOH_PRIMARY",
        "DS_DOH_SECONDARY",
        "DS_RDAP_ENDPOINT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn create_config_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write to temp file");
    file
}

#[test]
fn test_help_lists_flags() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--currency"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--pretty"))
        .stdout(predicate::str::contains("--max-candidates"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_query_is_usage_error() {
    let home = TempDir::new().unwrap();
    domain_search(&home).assert().failure();
}

#[test]
fn test_punctuation_query_exits_with_error() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .arg("!!!@@@")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid domain name"));
}

#[test]
fn test_json_and_pretty_conflict() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .args(["mybrand", "--json", "--pretty"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot combine --json with --pretty"));
}

#[test]
fn test_unknown_currency_rejected() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .args(["mybrand", "--currency", "eur"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown currency"));
}

#[test]
fn test_out_of_range_max_candidates_rejected() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .args(["mybrand", "--max-candidates", "40"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Max candidates must be between 1 and 15"));
}

#[test]
fn test_invalid_timeout_rejected() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .args(["mybrand", "--timeout", "soon"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid timeout"));
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    domain_search(&home)
        .args(["mybrand", "--config", "/nonexistent/domain-search.toml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_invalid_config_values_fail() {
    let home = TempDir::new().unwrap();
    let config = create_config_file(
        r#"
[defaults]
max_candidates = 99
"#,
    );

    domain_search(&home)
        .arg("mybrand")
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("max_candidates"));
}

#[test]
fn test_malformed_config_from_env_fails() {
    let home = TempDir::new().unwrap();
    let config = create_config_file("[defaults\ncurrency = ");

    domain_search(&home)
        .arg("mybrand")
        .env("DS_CONFIG", config.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_valid_config_still_rejects_bad_query() {
    let home = TempDir::new().unwrap();
    let config = create_config_file(
        r#"
[defaults]
currency = "usd"
default_extension = ".co.ke"
timeout = "5s"

[search]
alternate_extensions = [".ke", ".com"]

[pricing]
".co.ke" = { price = 8.5, renew_price = 8.5 }
"#,
    );

    domain_search(&home)
        .arg("---")
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid domain name"));
}
