#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

/// The `snipsync` binary running inside `root`, with colors and log filters
/// from the surrounding environment removed.
pub fn snipsync_cmd(root: &Path) -> Command {
	let mut cmd = Command::cargo_bin("snipsync").unwrap_or_else(|e| panic!("snipsync binary: {e}"));
	cmd.current_dir(root)
		.env("NO_COLOR", "1")
		.env_remove("SNIPSYNC_LOG")
		.env_remove("RUST_LOG");
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {relative}: {e}"));
}

/// A rust file defining `example` and a readme referencing it with stale
/// content.
pub fn write_example_project(root: &Path) {
	write_file(
		root,
		"src/lib.rs",
		"// snippet[example]\npub fn example() {}\n// /snippet\n",
	);
	write_file(
		root,
		"README.md",
		"# Example\n\n<!-- insertSnippet[example] -->\nstale\n<!-- /insertSnippet -->\n",
	);
}

pub const EXPECTED_README: &str = "# Example\n\n<!-- insertSnippet[example] -->\n```\npub fn \
                                   example() {}\n```\n\n<!-- /insertSnippet -->\n";
