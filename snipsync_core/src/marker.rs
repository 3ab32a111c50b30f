use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

/// A recognized inline tag denoting the start or end of a definition or
/// reference span.
///
/// Markers live inside whatever comment syntax the host document uses: an HTML
/// comment in markdown, a line comment in source code, or nothing at all in
/// plain text. Only the marker token itself is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
	/// The definition id, or the target file for file references. Empty on
	/// anonymous end markers.
	pub id: String,
	pub kind: MarkerKind,
	pub role: MarkerRole,
}

impl Marker {
	pub fn new(id: impl Into<String>, kind: MarkerKind, role: MarkerRole) -> Self {
		Self {
			id: id.into(),
			kind,
			role,
		}
	}

	pub fn is_start(&self) -> bool {
		self.role == MarkerRole::Start
	}

	pub fn is_end(&self) -> bool {
		self.role == MarkerRole::End
	}

	/// Whether this marker opens or closes a span that gets rewritten.
	pub fn is_reference(&self) -> bool {
		matches!(
			self.kind,
			MarkerKind::SnippetReference | MarkerKind::FileReference
		)
	}

	/// Whether this marker opens the definition named `id`.
	pub fn opens_definition(&self, id: &str) -> bool {
		self.kind == MarkerKind::Definition && self.is_start() && self.id == id
	}

	/// Whether this marker closes the definition named `id`. Anonymous end
	/// markers close any definition.
	pub fn closes_definition(&self, id: &str) -> bool {
		self.kind == MarkerKind::Definition && self.is_end() && (self.id.is_empty() || self.id == id)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MarkerKind {
	/// Brackets the canonical content for an id.
	///
	/// ```text
	/// // snippet[example]
	/// fn example() {}
	/// // /snippet
	/// ```
	Definition,
	/// Brackets a span replaced with a definition's content.
	///
	/// ```md
	/// <!-- insertSnippet[example] -->
	/// <!-- /insertSnippet -->
	/// ```
	SnippetReference,
	/// Brackets a span replaced with the whole content of another file.
	///
	/// ```md
	/// <!-- insertFile[src/main.rs] -->
	/// <!-- /insertFile -->
	/// ```
	FileReference,
}

impl std::fmt::Display for MarkerKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Definition => write!(f, "snippet"),
			Self::SnippetReference => write!(f, "insertSnippet"),
			Self::FileReference => write!(f, "insertFile"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerRole {
	Start,
	End,
}

/// The marker grammars found in the wild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SyntaxFamily {
	/// `snippet[id]` ... `/snippet`. End markers are anonymous.
	#[default]
	Bracket,
	/// `snippet: id` ... `/snippet: id`. End markers repeat the id.
	Colon,
}

impl std::str::FromStr for SyntaxFamily {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"bracket" => Ok(Self::Bracket),
			"colon" => Ok(Self::Colon),
			other => Err(format!("unknown marker syntax `{other}` (expected `bracket` or `colon`)")),
		}
	}
}

impl std::fmt::Display for SyntaxFamily {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Bracket => write!(f, "bracket"),
			Self::Colon => write!(f, "colon"),
		}
	}
}

/// A single pattern in a [`MarkerSyntax`] table. The first capture group, when
/// present, is the marker id.
#[derive(Debug, Clone)]
pub struct MarkerRule {
	pub kind: MarkerKind,
	pub role: MarkerRole,
	pub pattern: Regex,
}

impl MarkerRule {
	pub fn new(kind: MarkerKind, role: MarkerRole, pattern: Regex) -> Self {
		Self {
			kind,
			role,
			pattern,
		}
	}

	fn matches(&self, line: &str) -> Option<Marker> {
		let captures = self.pattern.captures(line)?;
		let id = captures
			.get(1)
			.map(|m| m.as_str().to_string())
			.unwrap_or_default();

		Some(Marker::new(id, self.kind, self.role))
	}
}

/// Characters that may not touch the front of a marker keyword. This keeps
/// words like `mysnippet[x]` and paths like `docs/a/snippet` from being read
/// as markers, while glued comments like `//snippet[x]` still match.
const LEAD: &str = r"(?:^|[^A-Za-z0-9_.])";
/// What may follow an anonymous end keyword. `/snippet[x]` is a start marker
/// behind a `/`, and `/snippets` is a word.
const END_TAIL: &str = r"(?:$|[^A-Za-z0-9_\[])";
/// Colon end markers carry an id, so `//snippet: x` would be ambiguous. A
/// glued `/` reads as a comment and the line is a start marker.
const COLON_END_LEAD: &str = r"(?:^|[^A-Za-z0-9_./])";
const ID: &str = r"([A-Za-z0-9_\-]+)";
const FILE_ID: &str = r"([A-Za-z0-9_\-./\\]+)";

/// An ordered table of marker patterns. Rules are tried in order and the
/// first match wins, so end rules are placed before start rules.
#[derive(Debug, Clone)]
pub struct MarkerSyntax {
	rules: Vec<MarkerRule>,
}

impl Default for MarkerSyntax {
	fn default() -> Self {
		Self::new(SyntaxFamily::default())
	}
}

impl MarkerSyntax {
	/// Build the table for one of the built-in grammar families.
	pub fn new(family: SyntaxFamily) -> Self {
		let rules = match family {
			SyntaxFamily::Bracket => bracket_rules(),
			SyntaxFamily::Colon => colon_rules(),
		};

		Self { rules }
	}

	/// Build a table from arbitrary rules, tried in the given order.
	pub fn custom(rules: Vec<MarkerRule>) -> Self {
		Self { rules }
	}

	pub fn rules(&self) -> &[MarkerRule] {
		&self.rules
	}

	/// Classify a single line. Returns `None` for plain content, including
	/// anything that only looks like a marker.
	pub fn classify(&self, line: &str) -> Option<Marker> {
		self.rules.iter().find_map(|rule| rule.matches(line))
	}
}

fn rule(kind: MarkerKind, role: MarkerRole, pattern: &str) -> MarkerRule {
	let pattern = Regex::new(pattern)
		.unwrap_or_else(|e| panic!("built-in marker pattern `{pattern}` is invalid: {e}"));
	MarkerRule::new(kind, role, pattern)
}

fn bracket_rules() -> Vec<MarkerRule> {
	use MarkerKind::Definition;
	use MarkerKind::FileReference;
	use MarkerKind::SnippetReference;
	use MarkerRole::End;
	use MarkerRole::Start;

	vec![
		rule(Definition, End, &format!(r"{LEAD}/snippet{END_TAIL}")),
		rule(Definition, Start, &format!(r"{LEAD}snippet\[\s*{ID}\s*\]")),
		rule(SnippetReference, End, &format!(r"{LEAD}/insertSnippet{END_TAIL}")),
		rule(
			SnippetReference,
			Start,
			&format!(r"{LEAD}insertSnippet\[\s*{ID}\s*\]"),
		),
		rule(FileReference, End, &format!(r"{LEAD}/insertFile{END_TAIL}")),
		rule(
			FileReference,
			Start,
			&format!(r"{LEAD}insertFile\[\s*{FILE_ID}\s*\]"),
		),
	]
}

fn colon_rules() -> Vec<MarkerRule> {
	use MarkerKind::Definition;
	use MarkerKind::FileReference;
	use MarkerKind::SnippetReference;
	use MarkerRole::End;
	use MarkerRole::Start;

	vec![
		rule(Definition, End, &format!(r"{COLON_END_LEAD}/snippet\s*:\s*{ID}")),
		rule(Definition, Start, &format!(r"{LEAD}snippet\s*:\s*{ID}")),
		rule(
			SnippetReference,
			End,
			&format!(r"{COLON_END_LEAD}/insertSnippet\s*:\s*{ID}"),
		),
		rule(
			SnippetReference,
			Start,
			&format!(r"{LEAD}insertSnippet\s*:\s*{ID}"),
		),
		rule(FileReference, End, &format!(r"{COLON_END_LEAD}/insertFile\s*:\s*{FILE_ID}")),
		rule(
			FileReference,
			Start,
			&format!(r"{LEAD}insertFile\s*:\s*{FILE_ID}"),
		),
	]
}
