use serde::Serialize;

use crate::Document;
use crate::MarkerKind;
use crate::MarkerSyntax;
use crate::ParsedDocument;
use crate::SnipError;
use crate::SnipResult;
use crate::TemplateRenderer;
use crate::document::parse_documents;
use crate::indent::strip_common_indent;
use crate::resolve::resolve_file;
use crate::resolve::resolve_snippet;
use crate::validate::validate_documents;

/// Everything the pipeline needs besides the documents themselves.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
	/// The marker grammar used to classify lines.
	pub syntax: MarkerSyntax,
	/// Default templates keyed by destination extension.
	pub renderer: TemplateRenderer,
	/// An explicit template applied to every reference. Empty means use the
	/// renderer's defaults.
	pub template: String,
}

/// A document whose content changes after replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentChange {
	pub file: String,
	/// Content before replacement.
	pub original: String,
	/// Content after replacement.
	pub updated: String,
}

/// Result of running the whole pipeline over a corpus.
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
	/// Every parsed document, in corpus order.
	pub documents: Vec<ParsedDocument>,
	/// Documents whose content differs after replacement.
	pub changes: Vec<DocumentChange>,
	/// Number of definitions found across the corpus.
	pub definition_count: usize,
	/// Number of snippet and file references found across the corpus.
	pub reference_count: usize,
}

impl SyncResult {
	/// Returns true when every reference span is already up to date.
	pub fn is_ok(&self) -> bool {
		self.changes.is_empty()
	}
}

/// Parse, validate, and rewrite a corpus.
///
/// Any validation violation aborts the run with [`SnipError::Validation`]
/// before a single document is rewritten.
pub fn sync_documents(documents: Vec<Document>, options: &SyncOptions) -> SnipResult<SyncResult> {
	let parsed = parse_documents(&documents, &options.syntax);

	let violations = validate_documents(&parsed);
	if !violations.is_empty() {
		tracing::debug!(count = violations.len(), "snippet validation failed");
		return Err(SnipError::Validation(violations));
	}
	tracing::info!("snippets successfully validated");

	let mut definition_count = 0;
	let mut reference_count = 0;
	for document in &parsed {
		let ids = document.definition_ids();
		definition_count += ids.len();
		reference_count += document.references().len();

		if ids.is_empty() {
			tracing::debug!(file = %document.file, "no snippets found");
		} else {
			tracing::info!(file = %document.file, snippets = ?ids, "found {} snippets", ids.len());
		}
	}

	let replaced = replace_references(&parsed, &options.renderer, &options.template)?;
	let changes: Vec<DocumentChange> = documents
		.into_iter()
		.zip(replaced)
		.filter(|(original, updated)| original.content != updated.content)
		.map(|(original, updated)| {
			DocumentChange {
				file: original.file,
				original: original.content,
				updated: updated.content,
			}
		})
		.collect();

	tracing::info!(
		changed = changes.len(),
		definitions = definition_count,
		references = reference_count,
		"snippets successfully replaced"
	);

	Ok(SyncResult {
		documents: parsed,
		changes,
		definition_count,
		reference_count,
	})
}

/// Rewrite every document of an already validated corpus.
pub fn replace_references(
	documents: &[ParsedDocument],
	renderer: &TemplateRenderer,
	template: &str,
) -> SnipResult<Vec<Document>> {
	documents
		.iter()
		.map(|document| replace_document(document, documents, renderer, template))
		.collect()
}

/// Rewrite the reference spans of a single document against `corpus`.
///
/// The start and end markers of each span are kept verbatim. The lines
/// between them are dropped and replaced with the resolved content, run
/// through the template. Every other line, including definition markers, is
/// copied unchanged.
pub fn replace_document(
	document: &ParsedDocument,
	corpus: &[ParsedDocument],
	renderer: &TemplateRenderer,
	template: &str,
) -> SnipResult<Document> {
	let mut output: Vec<String> = Vec::with_capacity(document.lines.len());
	let mut inside_reference = false;

	for line in &document.lines {
		let reference = line.marker.as_ref().filter(|marker| marker.is_reference());

		if inside_reference {
			if reference.is_some_and(|marker| marker.is_end()) {
				output.push(line.text.clone());
				inside_reference = false;
			}
			continue;
		}

		output.push(line.text.clone());

		let Some(marker) = reference.filter(|marker| marker.is_start()) else {
			continue;
		};

		let resolved = match marker.kind {
			MarkerKind::SnippetReference => {
				let mut resolved = resolve_snippet(corpus, &marker.id);
				resolved.lines = strip_common_indent(&resolved.lines);
				resolved
			}
			_ => resolve_file(corpus, &marker.id),
		};

		if resolved.origin.is_none() {
			tracing::warn!(file = %document.file, id = %marker.id, kind = %marker.kind, "nothing to insert");
		}

		let rendered =
			renderer.render_with_default(&resolved.lines, resolved.origin(), &document.file, template)?;
		output.extend(rendered);
		inside_reference = true;
	}

	Ok(Document {
		file: document.file.clone(),
		content: output.join("\n"),
	})
}
