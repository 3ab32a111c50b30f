use serde::Deserialize;
use serde::Serialize;

use crate::Marker;
use crate::MarkerKind;
use crate::MarkerSyntax;

/// A raw document as read from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	/// Identifier of the document, usually its path.
	pub file: String,
	/// The full text of the document.
	pub content: String,
}

impl Document {
	pub fn new(file: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			file: file.into(),
			content: content.into(),
		}
	}
}

/// One line of a [`ParsedDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLine {
	/// The line exactly as it appeared, without the line feed.
	pub text: String,
	/// 0-indexed line number.
	pub number: usize,
	/// The marker recognized on this line, if any.
	pub marker: Option<Marker>,
}

impl DocumentLine {
	/// 1-indexed line number for user facing messages.
	pub fn display_number(&self) -> usize {
		self.number + 1
	}
}

/// A document split into classified lines. Produced once by
/// [`parse_document`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
	pub file: String,
	pub lines: Vec<DocumentLine>,
}

impl ParsedDocument {
	/// Iterate over every line that carries a marker.
	pub fn markers(&self) -> impl Iterator<Item = (&DocumentLine, &Marker)> {
		self.lines
			.iter()
			.filter_map(|line| line.marker.as_ref().map(|marker| (line, marker)))
	}

	/// Ids of all definitions opened in this document, in document order.
	pub fn definition_ids(&self) -> Vec<&str> {
		self.markers()
			.filter(|(_, marker)| marker.kind == MarkerKind::Definition && marker.is_start())
			.map(|(_, marker)| marker.id.as_str())
			.collect()
	}

	/// References (snippet and file) opened in this document, in document
	/// order.
	pub fn references(&self) -> Vec<&Marker> {
		self.markers()
			.filter(|(_, marker)| marker.is_reference() && marker.is_start())
			.map(|(_, marker)| marker)
			.collect()
	}

	/// Rebuild the raw text from the lines.
	pub fn to_content(&self) -> String {
		self.lines
			.iter()
			.map(|line| line.text.as_str())
			.collect::<Vec<_>>()
			.join("\n")
	}
}

/// Split a document into lines and classify each one.
///
/// An empty document has no lines. When the content ends with a line feed an
/// extra empty line is kept at the end, so joining the lines with `\n`
/// reproduces the content exactly.
pub fn parse_document(document: &Document, syntax: &MarkerSyntax) -> ParsedDocument {
	let lines = if document.content.is_empty() {
		Vec::new()
	} else {
		document
			.content
			.split('\n')
			.enumerate()
			.map(|(number, text)| {
				DocumentLine {
					text: text.to_string(),
					number,
					marker: syntax.classify(text),
				}
			})
			.collect()
	};

	ParsedDocument {
		file: document.file.clone(),
		lines,
	}
}

/// Parse every document of a corpus, keeping corpus order.
pub fn parse_documents(documents: &[Document], syntax: &MarkerSyntax) -> Vec<ParsedDocument> {
	documents
		.iter()
		.map(|document| parse_document(document, syntax))
		.collect()
}
