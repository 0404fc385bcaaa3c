use std::io::Write as _;

use banner_cli::{command, run, EXIT_NEEDS_MIGRATION};
use banner_migration::{BannerConfig, CURRENT_BANNER_VERSION};
use banner_test_utils::legacy_v1_document;
use pretty_assertions::assert_eq;
use serde_json::json;

struct Output {
    code: u8,
    stdout: String,
    stderr: String,
}

fn invoke(args: &[&str], stdin: &str) -> anyhow::Result<Output> {
    let matches = command().try_get_matches_from(
        std::iter::once("banner-migrate").chain(args.iter().copied()),
    )?;
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run(&matches, &mut stdin.as_bytes(), &mut out, &mut err)?;
    Ok(Output {
        code,
        stdout: String::from_utf8(out)?,
        stderr: String::from_utf8(err)?,
    })
}

#[test]
fn test_migrate_from_stdin() {
    let output = invoke(
        &["migrate", "--compact", "--timestamp", "2024-01-01T00:00:00Z"],
        r#"{"version": "1.0.0", "text": {"title": "Hi"}}"#,
    )
    .unwrap();

    assert_eq!(output.code, 0);
    assert_eq!(output.stdout.lines().count(), 1);
    let doc = BannerConfig::from_json(output.stdout.trim()).unwrap();
    assert_eq!(doc.version(), Some(CURRENT_BANNER_VERSION));
    assert_eq!(doc.last_updated(), Some("2024-01-01T00:00:00.000Z"));
    assert_eq!(doc.as_map()["text"]["title"], json!("Hi"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_migrate_from_file_with_report() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", legacy_v1_document()).unwrap();
    let path = file.path().to_str().unwrap();

    let output = invoke(&["migrate", "--input", path, "--report"], "").unwrap();

    assert_eq!(output.code, 0);
    assert!(output.stdout.lines().count() > 1);
    assert!(output.stderr.contains("detected: 1.0.0"));
    assert!(output.stderr.contains("steps: v1_to_v2, v2_to_v2_1"));
    assert!(output.stderr.contains("+ compliance"));
}

#[test]
fn test_migrate_is_stable_for_fixed_timestamp() {
    let args = ["migrate", "--timestamp", "2024-06-30T12:00:00Z"];
    let first = invoke(&args, "{}").unwrap().stdout;
    let second = invoke(&args, "{}").unwrap().stdout;
    assert_eq!(first, second);
}

#[test]
fn test_migrate_non_object_gives_defaults() {
    let output = invoke(&["migrate", "--report"], "null").unwrap();
    let doc = BannerConfig::from_json(&output.stdout).unwrap();
    assert!(doc.has("compliance"));
    assert!(output.stderr.contains("replaced with defaults"));
}

#[test]
fn test_check_exit_codes() {
    let stale = invoke(&["check"], r#"{"version": "2.0.0"}"#).unwrap();
    assert_eq!(stale.code, EXIT_NEEDS_MIGRATION);
    assert!(stale.stdout.contains("2.0.0 -> 2.1.0 (1 step(s))"));

    let current = invoke(&["check"], &json!({"version": CURRENT_BANNER_VERSION}).to_string())
        .unwrap();
    assert_eq!(current.code, 0);
    assert_eq!(current.stdout.trim(), format!("up to date: {CURRENT_BANNER_VERSION}"));

    let invalid = invoke(&["check"], "[]").unwrap();
    assert_eq!(invalid.code, EXIT_NEEDS_MIGRATION);
    assert!(invalid.stdout.contains("invalid document"));
}

#[test]
fn test_notes() {
    let output = invoke(&["notes", "--from", "1.0.0", "--to", "2.0.0"], "").unwrap();
    assert_eq!(output.code, 0);
    assert!(output.stdout.lines().all(|line| line.starts_with("- ")));
    assert!(output.stdout.lines().count() > 1);

    let none = invoke(&["notes", "--from", "3.0.0", "--to", "4.0.0"], "").unwrap();
    assert!(none.stdout.is_empty());
    assert!(none.stderr.contains("no migration notes"));
}

#[test]
fn test_errors() {
    assert!(invoke(&["migrate"], "{not json").is_err());
    assert!(invoke(&["migrate", "--input", "/nonexistent/banner.json"], "").is_err());
    assert!(invoke(&["migrate", "--timestamp", "soon"], "{}").is_err());
    assert!(invoke(&["notes", "--from", "1.0.0"], "").is_err());
}
