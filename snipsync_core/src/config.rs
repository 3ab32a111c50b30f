use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DefaultTemplate;
use crate::SnipError;
use crate::SnipResult;
use crate::SyntaxFamily;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"snipsync.toml",
	".snipsync.toml",
	".config/snipsync.toml",
];

/// Project configuration read from `snipsync.toml`.
///
/// ```toml
/// template = "{{ content }}"
/// syntax = "colon"
/// max_file_size = 1048576
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["vendor/", "*.generated.md"]
///
/// [[templates]]
/// extensions = ["rst"]
/// template = ".. code-block::\n\n{{ content }}\n"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnipConfig {
	/// Template applied to every reference. Overrides the default table.
	#[serde(default)]
	pub template: Option<String>,
	/// Marker grammar. Defaults to the bracket family.
	#[serde(default)]
	pub syntax: Option<SyntaxFamily>,
	/// Files larger than this many bytes are rejected. Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` rules are not applied while scanning.
	#[serde(default)]
	pub disable_gitignore: bool,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Default templates consulted before the built-in table.
	#[serde(default)]
	pub templates: Vec<DefaultTemplate>,
}

/// Gitignore-style patterns for files and directories to skip. Applied on
/// top of `.gitignore` rules unless `disable_gitignore` is set.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl SnipConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no candidate exists.
	pub fn load(root: &Path) -> SnipResult<Option<SnipConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_from(&config_path).map(Some)
	}

	/// Load the config from an explicit path.
	pub fn load_from(path: &Path) -> SnipResult<SnipConfig> {
		let content = std::fs::read_to_string(path)?;
		let config: SnipConfig = toml::from_str(&content)
			.map_err(|e| SnipError::ConfigParse(format!("{}: {e}", path.display())))?;

		tracing::debug!(path = %path.display(), "loaded config");
		Ok(config)
	}
}
