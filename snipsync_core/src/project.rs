use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use derive_more::DerefMut;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::Document;
use crate::DocumentChange;
use crate::SnipError;
use crate::SnipResult;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::SnipConfig;

/// Number of leading bytes inspected when deciding whether a file is text.
pub const TEXT_SAMPLE_SIZE: usize = 1024;

/// Options for controlling how files are discovered.
///
/// Use [`ScanOptions::default()`] for sensible defaults or
/// [`ScanOptions::from_config`] to construct from a [`SnipConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Maximum file size to scan in bytes.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			exclude_patterns: Vec::new(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	pub fn from_config(config: Option<&SnipConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		Self {
			exclude_patterns: config.exclude.patterns.clone(),
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
		}
	}
}

/// The documents loaded from disk, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Corpus(Vec<Document>);

impl Corpus {
	pub fn into_documents(self) -> Vec<Document> {
		self.0
	}
}

impl From<Vec<Document>> for Corpus {
	fn from(documents: Vec<Document>) -> Self {
		Self(documents)
	}
}

/// Collect every file below the given files or directories.
///
/// Directories are walked in sorted order. Files passed explicitly are kept
/// even when they would be excluded by a directory walk. A file that shows up
/// twice is only returned once.
pub fn collect_files(paths: &[PathBuf], options: &ScanOptions) -> SnipResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut seen = HashSet::new();

	for path in paths {
		if !path.exists() {
			return Err(SnipError::PathNotFound(path.display().to_string()));
		}

		tracing::info!(path = %path.display(), "collecting files");

		let mut found = Vec::new();
		if path.is_dir() {
			let gitignore = if options.disable_gitignore {
				Gitignore::empty()
			} else {
				build_gitignore(path)
			};
			let custom_exclude = build_exclude_matcher(path, &options.exclude_patterns)?;
			let mut visited_dirs = HashSet::new();

			walk_dir(
				path,
				&mut found,
				&gitignore,
				&custom_exclude,
				&mut visited_dirs,
			)?;
			found.sort();
		} else {
			found.push(path.clone());
		}

		for file in found {
			check_file_size(&file, options.max_file_size)?;
			if seen.insert(file.clone()) {
				files.push(file);
			}
		}
	}

	Ok(files)
}

/// Build a `Gitignore` matcher from exclude patterns specified in
/// `snipsync.toml` `[exclude]`.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> SnipResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			SnipError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		SnipError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the `.gitignore` at `root`, if any.
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.is_file() {
		let error = builder.add(&gitignore_path);
		if let Some(e) = error {
			tracing::warn!(path = %gitignore_path.display(), error = %e, "could not read .gitignore");
		}
	}

	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Hidden entries and common dependency or build output directories.
fn is_ignored_entry_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
) -> SnipResult<()> {
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(SnipError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(is_ignored_entry_name)
		{
			continue;
		}

		let is_dir = path.is_dir();
		if gitignore.matched(&path, is_dir).is_ignore()
			|| custom_exclude.matched(&path, is_dir).is_ignore()
		{
			tracing::debug!(path = %path.display(), "excluded");
			continue;
		}

		if is_dir {
			walk_dir(&path, files, gitignore, custom_exclude, visited_dirs)?;
		} else if path.is_file() {
			files.push(path);
		}
	}

	Ok(())
}

fn check_file_size(path: &Path, limit: u64) -> SnipResult<()> {
	let size = std::fs::metadata(path)?.len();
	if size > limit {
		return Err(SnipError::FileTooLarge {
			path: path.display().to_string(),
			size,
			limit,
		});
	}

	Ok(())
}

/// Whether a sample of bytes looks like human readable text.
///
/// Only the first [`TEXT_SAMPLE_SIZE`] bytes are inspected. Invalid UTF-8 or a
/// control character other than `\n`, `\t`, `\f` or `\r` means binary. A
/// multi-byte sequence cut off at the end of the sample is ignored.
pub fn is_text(sample: &[u8]) -> bool {
	let sample = &sample[..sample.len().min(TEXT_SAMPLE_SIZE)];

	let text = match std::str::from_utf8(sample) {
		Ok(text) => text,
		// `error_len() == None` means the input ended mid-sequence.
		Err(e) if e.error_len().is_none() => {
			let valid = &sample[..e.valid_up_to()];
			match std::str::from_utf8(valid) {
				Ok(text) => text,
				Err(_) => return false,
			}
		}
		Err(_) => return false,
	};

	!text
		.chars()
		.any(|c| c.is_control() && !matches!(c, '\n' | '\t' | '\x0c' | '\r'))
}

/// Read at most `limit` leading bytes of a file.
pub fn read_head(path: &Path, limit: usize) -> SnipResult<Vec<u8>> {
	let file = std::fs::File::open(path)?;
	let mut head = Vec::with_capacity(limit);
	file.take(limit as u64).read_to_end(&mut head)?;
	Ok(head)
}

/// The document identifier for a path: `/` separated, without a leading
/// `./`.
pub fn file_id(path: &Path) -> String {
	let id = path.to_string_lossy().replace('\\', "/");
	match id.strip_prefix("./") {
		Some(stripped) => stripped.to_string(),
		None => id,
	}
}

/// Load every text file as a [`Document`]. Binary files are skipped.
pub fn load_documents(files: &[PathBuf]) -> SnipResult<Corpus> {
	let mut documents = Vec::with_capacity(files.len());

	for path in files {
		if !is_text(&read_head(path, TEXT_SAMPLE_SIZE)?) {
			tracing::debug!(file = %path.display(), "ignoring non-text file");
			continue;
		}

		let Ok(content) = String::from_utf8(std::fs::read(path)?) else {
			tracing::debug!(file = %path.display(), "ignoring file with invalid utf-8");
			continue;
		};

		tracing::debug!(file = %path.display(), "found text file");
		documents.push(Document::new(file_id(path), content));
	}

	Ok(Corpus(documents))
}

/// Write updated documents back to disk, replacing their whole content.
pub fn write_changes(changes: &[DocumentChange]) -> SnipResult<()> {
	for change in changes {
		std::fs::write(&change.file, &change.updated)?;
		tracing::info!(file = %change.file, "updated");
	}

	Ok(())
}
