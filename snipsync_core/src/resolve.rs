use crate::ParsedDocument;

/// Content resolved for a reference span, together with the file it came
/// from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
	pub lines: Vec<String>,
	/// The document the content was taken from. `None` when nothing matched.
	pub origin: Option<String>,
}

impl Resolved {
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	pub fn origin(&self) -> &str {
		self.origin.as_deref().unwrap_or_default()
	}
}

/// Collect the lines of the definition named `id`. Marker lines nested inside
/// the definition are left out. Returns an empty result when the id is never
/// defined.
pub fn resolve_snippet(documents: &[ParsedDocument], id: &str) -> Resolved {
	for document in documents {
		let mut captured: Option<Vec<String>> = None;

		for line in &document.lines {
			if let Some(lines) = captured.as_mut() {
				match &line.marker {
					Some(marker) if marker.closes_definition(id) => {
						return Resolved {
							lines: std::mem::take(lines),
							origin: Some(document.file.clone()),
						};
					}
					Some(_) => {}
					None => lines.push(line.text.clone()),
				}
			} else if line
				.marker
				.as_ref()
				.is_some_and(|marker| marker.opens_definition(id))
			{
				captured = Some(Vec::new());
			}
		}

		if let Some(lines) = captured {
			return Resolved {
				lines,
				origin: Some(document.file.clone()),
			};
		}
	}

	Resolved::default()
}

/// Collect every line of the first document whose identifier matches
/// `target`. Markers inside the included file are kept as plain text.
pub fn resolve_file(documents: &[ParsedDocument], target: &str) -> Resolved {
	documents
		.iter()
		.find(|document| file_matches(&document.file, target))
		.map(|document| {
			Resolved {
				lines: document.lines.iter().map(|line| line.text.clone()).collect(),
				origin: Some(document.file.clone()),
			}
		})
		.unwrap_or_default()
}

/// Whether `file` is `target` or ends with it on a path component boundary,
/// so `docs/intro.md` matches `intro.md` but `outro.md` does not match `ro.md`.
pub fn file_matches(file: &str, target: &str) -> bool {
	let file = file.replace('\\', "/");
	let target = target.replace('\\', "/");
	let target = target.trim_start_matches("./");

	if target.is_empty() {
		return false;
	}

	file == target
		|| file
			.strip_suffix(target)
			.is_some_and(|prefix| prefix.ends_with('/'))
}
