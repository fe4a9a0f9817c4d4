//! Integration tests for the `queryserver` binary against live databases.
//!
//! These tests are behind the `integration-tests` feature flag and won't run
//! with regular `cargo test`. They read the target from `DATABASE_URL`.

#![cfg(feature = "integration-tests")]

use std::process::Command;

use tempfile::tempdir;

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

fn run_report(args: &[&str]) -> serde_json::Value {
    let dir = tempdir().expect("temp dir");
    let output = Command::new(env!("CARGO_BIN_EXE_queryserver"))
        .args(args)
        .env("QUERYSERVER_CONF_DIR", dir.path())
        .current_dir(dir.path())
        .output()
        .expect("failed to execute queryserver CLI");
    if !output.status.success() {
        panic!(
            "CLI failed with status {:?}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    serde_json::from_slice(&output.stdout).expect("json report")
}

#[test]
fn live_database_plain_provider() {
    let url = database_url();
    let report = run_report(&[
        "-q",
        "-f",
        "json",
        "-D",
        "phoenix.query.server.metrics=false",
        &url,
    ]);

    assert_eq!(report["variant"], "plain");
    assert_eq!(report["url"], url.as_str());
}

#[test]
fn live_database_instrumented_provider() {
    let url = database_url();
    let report = run_report(&["-q", "-f", "json", "-D", "avatica.user=scott", &url]);

    assert_eq!(report["variant"], "instrumented");
    assert_eq!(report["properties"]["avatica.user"], "scott");
    assert_eq!(report["properties"]["pqs_sinktype"], "file");
}
