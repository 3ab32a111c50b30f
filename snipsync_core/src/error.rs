use miette::Diagnostic;
use thiserror::Error;

use crate::Violation;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SnipError {
	#[error(transparent)]
	#[diagnostic(code(snipsync::io_error))]
	Io(#[from] std::io::Error),

	#[error("folder or file `{0}` not found")]
	#[diagnostic(
		code(snipsync::path_not_found),
		help("pass existing files or directories to scan")
	)]
	PathNotFound(String),

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(snipsync::file_too_large),
		help("increase `max_file_size` in snipsync.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(snipsync::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(snipsync::config_parse),
		help("check that snipsync.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(snipsync::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("validating snippets failed with {} error(s)", .0.len())]
	#[diagnostic(
		code(snipsync::validation),
		help("fix the reported markers; no files were rewritten")
	)]
	Validation(#[related] Vec<Violation>),

	#[error("rendering snippet template for `{file}` failed: {reason}")]
	#[diagnostic(code(snipsync::template_render))]
	TemplateRender { file: String, reason: String },

	#[error("rendering snippet template with content from `{origin}` failed: {reason}")]
	#[diagnostic(code(snipsync::content_render))]
	ContentRender { origin: String, reason: String },

	#[error("validating the template failed: {0}")]
	#[diagnostic(
		code(snipsync::invalid_template),
		help("available variables are `content` and `filename`, e.g. `{{{{ content }}}}`")
	)]
	InvalidTemplate(String),
}

impl SnipError {
	/// The structural violations carried by a [`SnipError::Validation`].
	pub fn violations(&self) -> &[Violation] {
		match self {
			Self::Validation(violations) => violations,
			_ => &[],
		}
	}
}

pub type SnipResult<T> = Result<T, SnipError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
