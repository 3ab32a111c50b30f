use std::collections::HashSet;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::MarkerKind;
use crate::ParsedDocument;
use crate::resolve::file_matches;

/// A `file:line` location of a marker, with a 1-indexed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerLocation {
	pub file: String,
	pub line: usize,
}

impl std::fmt::Display for MarkerLocation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.file, self.line)
	}
}

/// A structural problem in the corpus that prevents any rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error, Serialize)]
#[non_exhaustive]
pub enum Violation {
	#[error("insert file snippet '{file}' references itself")]
	#[diagnostic(
		code(snipsync::self_reference),
		help("a file cannot include its own content")
	)]
	SelfReference { file: String },

	#[error("start marker for snippet '{id}' found more than once ({})", format_locations(.locations))]
	#[diagnostic(
		code(snipsync::duplicate_definition),
		help("each snippet id must be defined exactly once across all scanned files")
	)]
	DuplicateDefinition {
		id: String,
		locations: Vec<MarkerLocation>,
	},

	#[error("not all start markers are closed in '{file}'")]
	#[diagnostic(
		code(snipsync::unclosed_marker),
		help("add the matching end marker, e.g. `/snippet` or `/insertSnippet`")
	)]
	UnclosedStartMarkers { file: String },

	#[error("too many end markers found in '{file}'")]
	#[diagnostic(
		code(snipsync::unopened_marker),
		help("remove the extra end marker or add the start marker it belongs to")
	)]
	ExcessEndMarkers { file: String },

	#[error("reference start marker at '{file}:{line}' is inside another reference span")]
	#[diagnostic(
		code(snipsync::nested_reference),
		help("close the open span with `/insertSnippet` or `/insertFile` before starting another")
	)]
	NestedReference { file: String, line: usize },

	#[error("referenced snippet '{id}' not found")]
	#[diagnostic(
		code(snipsync::missing_definition),
		help("define it with `snippet[{id}]` ... `/snippet` in any scanned file")
	)]
	MissingDefinition { id: String },
}

fn format_locations(locations: &[MarkerLocation]) -> String {
	locations
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

/// Run every corpus check and collect the violations. An empty result means
/// the corpus can be rewritten safely.
///
/// Duplicate definitions make every id lookup ambiguous, so when one is found
/// the balance and missing-definition checks are skipped.
pub fn validate_documents(documents: &[ParsedDocument]) -> Vec<Violation> {
	let mut violations = find_self_references(documents);

	let duplicates = find_duplicate_definitions(documents);
	if !duplicates.is_empty() {
		violations.extend(duplicates);
		return violations;
	}

	violations.extend(find_unbalanced_markers(documents));
	violations.extend(find_nested_references(documents));
	violations.extend(find_missing_definitions(documents));
	violations
}

/// File references whose target resolves to the referencing document itself.
/// Targets match by path suffix, so `insertFile[a.md]` inside `docs/a.md`
/// counts unless another document matching `a.md` comes first.
pub fn find_self_references(documents: &[ParsedDocument]) -> Vec<Violation> {
	let mut violations = Vec::new();

	for document in documents {
		let references_itself = document.markers().any(|(_, marker)| {
			marker.kind == MarkerKind::FileReference
				&& marker.is_start()
				&& documents
					.iter()
					.find(|candidate| file_matches(&candidate.file, &marker.id))
					.is_some_and(|target| target.file == document.file)
		});

		if references_itself {
			violations.push(Violation::SelfReference {
				file: document.file.clone(),
			});
		}
	}

	violations
}

/// Definition ids opened more than once anywhere in the corpus, reported in
/// order of first appearance.
pub fn find_duplicate_definitions(documents: &[ParsedDocument]) -> Vec<Violation> {
	let mut seen: Vec<(&str, Vec<MarkerLocation>)> = Vec::new();

	for document in documents {
		for (line, marker) in document.markers() {
			if marker.kind != MarkerKind::Definition || !marker.is_start() {
				continue;
			}

			let location = MarkerLocation {
				file: document.file.clone(),
				line: line.display_number(),
			};

			match seen.iter_mut().find(|(id, _)| *id == marker.id) {
				Some((_, locations)) => locations.push(location),
				None => seen.push((marker.id.as_str(), vec![location])),
			}
		}
	}

	seen.into_iter()
		.filter(|(_, locations)| locations.len() > 1)
		.map(|(id, locations)| {
			Violation::DuplicateDefinition {
				id: id.to_string(),
				locations,
			}
		})
		.collect()
}

/// Documents whose start and end markers do not pair up within each marker
/// kind. At most one violation is reported per document, preferring unclosed
/// starts.
pub fn find_unbalanced_markers(documents: &[ParsedDocument]) -> Vec<Violation> {
	const KINDS: [MarkerKind; 3] = [
		MarkerKind::Definition,
		MarkerKind::SnippetReference,
		MarkerKind::FileReference,
	];

	let mut violations = Vec::new();

	for document in documents {
		let mut unclosed = false;
		let mut unopened = false;

		for kind in KINDS {
			let (starts, ends) = document
				.markers()
				.filter(|(_, marker)| marker.kind == kind)
				.fold((0usize, 0usize), |(starts, ends), (_, marker)| {
					if marker.is_start() {
						(starts + 1, ends)
					} else {
						(starts, ends + 1)
					}
				});

			unclosed |= starts > ends;
			unopened |= ends > starts;
		}

		if unclosed {
			violations.push(Violation::UnclosedStartMarkers {
				file: document.file.clone(),
			});
		} else if unopened {
			violations.push(Violation::ExcessEndMarkers {
				file: document.file.clone(),
			});
		}
	}

	violations
}

/// Reference start markers that appear while another reference span in the
/// same document is still open. Everything up to the next reference end is
/// replaced, so the inner marker would be lost.
pub fn find_nested_references(documents: &[ParsedDocument]) -> Vec<Violation> {
	let mut violations = Vec::new();

	for document in documents {
		let mut open = false;

		for (line, marker) in document.markers() {
			if !marker.is_reference() {
				continue;
			}

			if marker.is_end() {
				open = false;
			} else if open {
				violations.push(Violation::NestedReference {
					file: document.file.clone(),
					line: line.display_number(),
				});
			} else {
				open = true;
			}
		}
	}

	violations
}

/// Snippet references with no definition anywhere in the corpus. Each id is
/// reported once.
pub fn find_missing_definitions(documents: &[ParsedDocument]) -> Vec<Violation> {
	let defined: HashSet<&str> = documents
		.iter()
		.flat_map(|document| document.markers())
		.filter(|(_, marker)| marker.kind == MarkerKind::Definition && marker.is_start())
		.map(|(_, marker)| marker.id.as_str())
		.collect();

	let mut reported: HashSet<&str> = HashSet::new();
	let mut violations = Vec::new();

	for document in documents {
		for (_, marker) in document.markers() {
			if marker.kind != MarkerKind::SnippetReference || !marker.is_start() {
				continue;
			}

			if !defined.contains(marker.id.as_str()) && reported.insert(marker.id.as_str()) {
				violations.push(Violation::MissingDefinition {
					id: marker.id.clone(),
				});
			}
		}
	}

	violations
}
