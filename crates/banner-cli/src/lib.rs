//! Banner Migrate CLI
//!
//! Command definition and handlers for the `banner-migrate` binary. Kept in
//! a library so handlers can be driven with in-memory streams.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use banner_migration::{
    detect_version, get_migration_notes, FixedClock, MigrationReport, MigrationRunner,
};
use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::Value as JsonValue;

/// Exit code when `check` finds a document that needs migration
pub const EXIT_NEEDS_MIGRATION: u8 = 1;

/// Build the command tree
#[must_use]
pub fn command() -> Command {
    let input = Arg::new("input")
        .long("input")
        .short('i')
        .value_name("FILE")
        .help("Read the document from FILE instead of stdin ('-' for stdin)");

    Command::new("banner-migrate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect, check and migrate stored cookie banner documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("migrate")
                .about("Print the document migrated to the current schema")
                .arg(input.clone())
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Print on one line instead of pretty-printing"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .action(ArgAction::SetTrue)
                        .help("Describe applied steps and filled fields on stderr"),
                )
                .arg(
                    Arg::new("timestamp")
                        .long("timestamp")
                        .value_name("RFC3339")
                        .value_parser(parse_timestamp)
                        .help("Stamp lastUpdated with this instant instead of now"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report whether the document needs migration (exit code 1 if so)")
                .arg(input),
        )
        .subcommand(
            Command::new("notes")
                .about("Print the changelog for one version transition")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("Version migrated from, e.g. 1.0.0"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(value_parser!(String))
                        .help("Version migrated to, e.g. 2.0.0"),
                ),
        )
}

/// Run the selected subcommand, returning the process exit code
///
/// # Errors
/// Returns error if the input cannot be read or is not JSON, or an output
/// stream fails
pub fn run(
    matches: &ArgMatches,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<u8> {
    match matches.subcommand() {
        Some(("migrate", args)) => {
            let document = read_document(args.get_one::<String>("input"), stdin)?;
            let runner = match args.get_one::<DateTime<Utc>>("timestamp") {
                Some(instant) => MigrationRunner::new().with_clock(FixedClock::new(*instant)),
                None => MigrationRunner::new(),
            };

            let outcome = runner.migrate_with_report(&document);
            let rendered = if args.get_flag("compact") {
                outcome.config.to_json()?
            } else {
                outcome.config.to_json_pretty()?
            };
            writeln!(stdout, "{rendered}")?;

            if args.get_flag("report") {
                write_report(stderr, &outcome.report, &runner)?;
            }
            Ok(0)
        }
        Some(("check", args)) => {
            let document = read_document(args.get_one::<String>("input"), stdin)?;
            let runner = MigrationRunner::new();
            let detected = detect_version(&document);
            let target = runner.target_version();

            if runner.needs_migration(&document) {
                let steps = detected
                    .effective()
                    .map_or(0, |from| runner.chain().plan(&from).len());
                writeln!(
                    stdout,
                    "needs migration: {detected} -> {target} ({steps} step(s))"
                )?;
                Ok(EXIT_NEEDS_MIGRATION)
            } else {
                writeln!(stdout, "up to date: {target}")?;
                Ok(0)
            }
        }
        Some(("notes", args)) => {
            let from = args.get_one::<String>("from").map_or("", String::as_str);
            let to = args.get_one::<String>("to").map_or("", String::as_str);

            let notes = get_migration_notes(from, to);
            if notes.is_empty() {
                writeln!(stderr, "no migration notes for {from} -> {to}")?;
            }
            for note in notes {
                writeln!(stdout, "- {note}")?;
            }
            Ok(0)
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

fn read_document(input: Option<&String>, stdin: &mut dyn Read) -> Result<JsonValue> {
    let (source, text) = match input.map(String::as_str) {
        None | Some("-") => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            ("stdin".to_owned(), text)
        }
        Some(path) => {
            let text = fs::read_to_string(Path::new(path))
                .with_context(|| format!("failed to read {path}"))?;
            (path.to_owned(), text)
        }
    };

    tracing::debug!("Read {} bytes from {}", text.len(), source);
    serde_json::from_str(&text).with_context(|| format!("{source} is not valid JSON"))
}

fn write_report(
    out: &mut dyn Write,
    report: &MigrationReport,
    runner: &MigrationRunner,
) -> Result<()> {
    writeln!(out, "detected: {}", report.detected)?;
    writeln!(out, "target: {}", runner.target_version())?;
    if report.reset {
        writeln!(out, "input was not an object; replaced with defaults")?;
    }
    let applied = if report.applied.is_empty() {
        "none".to_owned()
    } else {
        report.applied.join(", ")
    };
    writeln!(out, "steps: {applied}")?;
    writeln!(out, "filled: {} field(s)", report.filled.len())?;
    for path in &report.filled {
        writeln!(out, "  + {path}")?;
    }
    if !report.repaired.is_empty() {
        writeln!(out, "repaired: {} field(s)", report.repaired.len())?;
        for path in &report.repaired {
            writeln!(out, "  ! {path}")?;
        }
    }
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("invalid RFC 3339 timestamp: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn timestamp_parser() {
        let instant = parse_timestamp("2024-02-29T23:59:59+01:00").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-02-29T22:59:59+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
