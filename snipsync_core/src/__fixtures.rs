use std::path::Path;

use crate::Document;
use crate::MarkerSyntax;
use crate::ParsedDocument;
use crate::parse_document;

pub(crate) fn lines(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| (*value).to_string()).collect()
}

pub(crate) fn content(values: &[&str]) -> String {
	values.join("\n")
}

pub(crate) fn document(file: &str, values: &[&str]) -> Document {
	Document::new(file, content(values))
}

pub(crate) fn parsed(file: &str, values: &[&str]) -> ParsedDocument {
	parse_document(&document(file, values), &MarkerSyntax::default())
}

/// A definition of `snippet1` holding a single line.
pub(crate) fn snippet1_definition() -> ParsedDocument {
	parsed(
		"file1",
		&["// snippet[snippet1]", "snippet1 line1", "// /snippet"],
	)
}

/// Three plain files named `yolo1`, `yolo2` and `yolo3`.
pub(crate) fn yolo_documents() -> Vec<ParsedDocument> {
	vec![
		parsed("yolo1", &["yolo1 content"]),
		parsed("yolo2", &["yolo2 content"]),
		parsed("yolo3", &["yolo3 content"]),
	]
}

pub(crate) fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {relative}: {e}"));
}
