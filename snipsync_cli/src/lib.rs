use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use snipsync_core::SyntaxFamily;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Keep code snippets in documentation in sync with their source.",
	long_about = "snipsync copies text between marked spans of files.\n\nMark a span once with \
	              `snippet[id]` ... `/snippet` and reference it anywhere with `insertSnippet[id]` \
	              ... `/insertSnippet`, or pull in a whole file with `insertFile[path]` ... \
	              `/insertFile`.\n\nQuick start:\n  snipsync update .  Rewrite every reference \
	              span\n  snipsync check .   Verify everything is up to date"
)]
pub struct SnipCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to a config file. Defaults to `snipsync.toml`, `.snipsync.toml` or
	/// `.config/snipsync.toml` in the current directory.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Template applied to every inserted snippet. `\n` is read as a newline.
	/// Overrides the defaults chosen by file extension.
	#[arg(long, short, global = true)]
	pub template: Option<String>,

	/// Marker grammar to recognize.
	#[arg(long, global = true)]
	pub syntax: Option<SyntaxFamily>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Rewrite every reference span with the latest content.
	///
	/// All files below the given paths are validated first. When any marker
	/// problem is found nothing is written.
	Update {
		/// Files or directories to scan.
		#[arg(required = true)]
		paths: Vec<PathBuf>,

		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch for file changes and re-run updates automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Check that every reference span is up to date.
	///
	/// Exits with status 1 when any file would change. Ideal for CI.
	Check {
		/// Files or directories to scan.
		#[arg(required = true)]
		paths: Vec<PathBuf>,

		/// Show a unified diff for each stale file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List snippet definitions and references per file.
	List {
		/// Files or directories to scan.
		#[arg(required = true)]
		paths: Vec<PathBuf>,
	},
	/// Print the default templates, keyed by file extension.
	Templates,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each stale entry includes
	/// the file path together with its current and expected content.
	Json,
}
