mod common;

use common::EXPECTED_README;
use common::snipsync_cmd;
use common::write_example_project;
use common::write_file;
use predicates::prelude::PredicateBooleanExt;
use snipsync_core::AnyEmptyResult;

#[test]
fn update_replaces_stale_content() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg(".")
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated 1 file(s)."));

	let readme = std::fs::read_to_string(tmp.path().join("README.md"))?;
	similar_asserts::assert_eq!(readme, EXPECTED_README);

	let source = std::fs::read_to_string(tmp.path().join("src/lib.rs"))?;
	assert!(source.contains("pub fn example() {}"));

	Ok(())
}

#[test]
fn update_noop_when_in_sync() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());
	write_file(tmp.path(), "README.md", EXPECTED_README);

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg(".")
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	Ok(())
}

#[test]
fn update_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());
	let before = std::fs::read_to_string(tmp.path().join("README.md"))?;

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg("--dry-run")
		.arg(".")
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would update 1 file(s):"))
		.stdout(predicates::str::contains("README.md"));

	let after = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert_eq!(before, after);

	Ok(())
}

#[test]
fn update_only_scans_given_paths() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());
	write_file(
		tmp.path(),
		"other/notes.md",
		"<!-- insertSnippet[example] -->\nstale\n<!-- /insertSnippet -->",
	);

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg("src")
		.arg("README.md")
		.assert()
		.success();

	let notes = std::fs::read_to_string(tmp.path().join("other/notes.md"))?;
	assert!(notes.contains("stale"));

	Ok(())
}

#[test]
fn update_includes_whole_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "data/values.txt", "yolo1\nyolo2\nyolo3");
	write_file(
		tmp.path(),
		"notes.txt",
		"lorem\ninsertFile[data/values.txt]\nsome old Content\n/insertFile\nipsum",
	);

	snipsync_cmd(tmp.path()).arg("update").arg(".").assert().success();

	let notes = std::fs::read_to_string(tmp.path().join("notes.txt"))?;
	assert_eq!(
		notes,
		"lorem\ninsertFile[data/values.txt]\nyolo1\nyolo2\nyolo3\n/insertFile\nipsum"
	);

	Ok(())
}

#[test]
fn update_with_template_flag() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "a.txt", "snippet[id1]\nvalue\n/snippet\n");
	write_file(tmp.path(), "b.txt", "insertSnippet[id1]\n/insertSnippet\n");

	snipsync_cmd(tmp.path())
		.arg("--template")
		.arg(r"from {{ filename }}:\n{{ content }}")
		.arg("update")
		.arg(".")
		.assert()
		.success();

	let updated = std::fs::read_to_string(tmp.path().join("b.txt"))?;
	assert_eq!(updated, "insertSnippet[id1]\nfrom a.txt:\nvalue\n/insertSnippet\n");

	Ok(())
}

#[test]
fn update_with_colon_syntax() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "a.txt", "snippet: id1\nvalue\n/snippet: id1\n");
	write_file(tmp.path(), "b.txt", "insertSnippet: id1\nold\n/insertSnippet: id1\n");

	snipsync_cmd(tmp.path())
		.arg("--syntax")
		.arg("colon")
		.arg("update")
		.arg(".")
		.assert()
		.success();

	let updated = std::fs::read_to_string(tmp.path().join("b.txt"))?;
	assert_eq!(updated, "insertSnippet: id1\nvalue\n/insertSnippet: id1\n");

	Ok(())
}

#[test]
fn update_skips_binary_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());
	std::fs::write(tmp.path().join("image.bin"), [0u8, 159, 146, 150])?;

	snipsync_cmd(tmp.path()).arg("update").arg(".").assert().success();

	Ok(())
}

#[test]
fn update_reports_missing_definition() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let content = "insertSnippet[snippet1]\nstale\n/insertSnippet\n";
	write_file(tmp.path(), "a.txt", content);

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg(".")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("validating snippets failed"))
		.stderr(predicates::str::contains("referenced snippet 'snippet1' not found"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("a.txt"))?, content);

	Ok(())
}

#[test]
fn update_reports_unbalanced_markers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "a.txt", "snippet[id1]\nnever closed\n");

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg(".")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("not all start markers are closed"));

	Ok(())
}

#[test]
fn update_leaves_span_closed_by_wrong_end_marker_untouched() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let target = "insertSnippet[a]\nold\n/snippet\nkeep me\nand me\n";
	write_file(tmp.path(), "def.txt", "snippet[a]\nnew\n/snippet\n");
	write_file(tmp.path(), "target.txt", target);

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg(".")
		.assert()
		.code(2)
		.stderr(predicates::str::contains(
			"not all start markers are closed in 'target.txt'",
		));

	let after = std::fs::read_to_string(tmp.path().join("target.txt"))?;
	similar_asserts::assert_eq!(after, target);

	Ok(())
}

#[test]
fn update_rejects_invalid_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());

	snipsync_cmd(tmp.path())
		.arg("--template")
		.arg("{{ unknown }}")
		.arg("update")
		.arg(".")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("validating the template failed"));

	let readme = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert!(readme.contains("stale"));

	Ok(())
}

#[test]
fn update_missing_path() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	snipsync_cmd(tmp.path())
		.arg("update")
		.arg("does-not-exist")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("does-not-exist").and(predicates::str::contains("not found")));

	Ok(())
}

#[test]
fn update_requires_paths() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	snipsync_cmd(tmp.path()).arg("update").assert().failure();

	Ok(())
}

#[test]
fn verbose_update_logs_progress() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_example_project(tmp.path());

	snipsync_cmd(tmp.path())
		.arg("--verbose")
		.arg("update")
		.arg(".")
		.assert()
		.success()
		.stdout(predicates::str::contains("1 definition(s), 1 reference(s)"))
		.stderr(predicates::str::contains("snippets successfully validated"));

	Ok(())
}
