mod common;

use clap::Parser;
use common::EXPECTED_README;
use common::snipsync_cmd;
use common::write_example_project;
use common::write_file;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use snipsync_cli::Commands;
use snipsync_cli::OutputFormat;
use snipsync_cli::SnipCli;
use snipsync_core::AnyEmptyResult;
use snipsync_core::SyntaxFamily;

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());
	write_file(tmp.path(), "README.md", EXPECTED_README);

	snipsync_cmd(tmp.path())
		.arg("check")
		.arg(".")
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_fails_when_stale() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());

	snipsync_cmd(tmp.path())
		.arg("check")
		.arg(".")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("Stale files:"))
		.stderr(predicates::str::contains("README.md"))
		.stderr(predicates::str::contains("1 file(s) are out of date"));

	let readme = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert!(readme.contains("stale"), "check must never write");

	Ok(())
}

#[test]
fn check_shows_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());

	snipsync_cmd(tmp.path())
		.arg("check")
		.arg("--diff")
		.arg(".")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-stale"))
		.stderr(predicates::str::contains("+pub fn example() {}"));

	Ok(())
}

#[test]
fn check_without_diff_hides_content() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());

	snipsync_cmd(tmp.path())
		.arg("check")
		.arg(".")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-stale").not());

	Ok(())
}

#[test]
fn check_json_reports_stale_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());

	let output = snipsync_cmd(tmp.path())
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg(".")
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["stale"][0]["file"], "README.md");
	assert_eq!(json["stale"][0]["expected"], EXPECTED_README);

	Ok(())
}

#[test]
fn check_json_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "plain.txt", "nothing to see");

	let output = snipsync_cmd(tmp.path())
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg(".")
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(true));
	assert_eq!(json["stale"], Value::Array(vec![]));

	Ok(())
}

#[test]
fn check_reports_duplicate_definitions() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "a.txt", "snippet[id1]\na\n/snippet\n");
	write_file(tmp.path(), "b.txt", "snippet[id1]\nb\n/snippet\n");

	snipsync_cmd(tmp.path())
		.arg("check")
		.arg(".")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("found more than once"));

	Ok(())
}

#[test]
fn parse_global_flags_after_subcommand() -> AnyEmptyResult {
	let cli = SnipCli::try_parse_from([
		"snipsync",
		"check",
		"docs",
		"--diff",
		"--format",
		"json",
		"--syntax",
		"colon",
	])?;

	assert_eq!(cli.syntax, Some(SyntaxFamily::Colon));
	assert!(matches!(
		cli.command,
		Some(Commands::Check {
			diff: true,
			format: OutputFormat::Json,
			..
		})
	));

	Ok(())
}
