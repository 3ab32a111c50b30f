use serde::Deserialize;
use serde::Serialize;

use crate::SnipError;
use crate::SnipResult;

/// Help text listing the variables available inside a snippet template.
pub const TEMPLATE_HELP: &str = "\t{{ content }}\tsnippet content\n\t{{ filename }}\tthe file the \
                                 snippet content originated from\n";

const TEMPLATE_NAME: &str = "snippet";

/// A template applied by default when the destination file has one of the
/// given extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultTemplate {
	/// Extensions without the leading dot, matched case-insensitively.
	pub extensions: Vec<String>,
	/// The template source. Literal `\n` sequences are treated as newlines.
	pub template: String,
}

impl DefaultTemplate {
	pub fn new(extensions: &[&str], template: impl Into<String>) -> Self {
		Self {
			extensions: extensions.iter().map(|ext| (*ext).to_string()).collect(),
			template: template.into(),
		}
	}

	/// Whether `file` ends with `.<ext>` for any of this template's
	/// extensions.
	pub fn applies_to(&self, file: &str) -> bool {
		let file = file.to_lowercase();
		self.extensions.iter().any(|ext| {
			let ext = ext.trim_start_matches('.').to_lowercase();
			!ext.is_empty() && file.ends_with(&format!(".{ext}"))
		})
	}
}

/// Renders resolved content, falling back to a table of default templates
/// keyed by the destination file's extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRenderer {
	defaults: Vec<DefaultTemplate>,
}

impl Default for TemplateRenderer {
	fn default() -> Self {
		Self::with_defaults(builtin_templates())
	}
}

impl TemplateRenderer {
	/// A renderer with exactly the given default table.
	pub fn with_defaults(defaults: Vec<DefaultTemplate>) -> Self {
		Self { defaults }
	}

	/// Add entries that take precedence over the existing table.
	#[must_use]
	pub fn prepend(mut self, extra: impl IntoIterator<Item = DefaultTemplate>) -> Self {
		let mut defaults: Vec<DefaultTemplate> = extra.into_iter().collect();
		defaults.append(&mut self.defaults);
		self.defaults = defaults;
		self
	}

	pub fn defaults(&self) -> &[DefaultTemplate] {
		&self.defaults
	}

	/// The first default template that applies to `dest_file`.
	pub fn template_for(&self, dest_file: &str) -> Option<&DefaultTemplate> {
		self.defaults
			.iter()
			.find(|template| template.applies_to(dest_file))
	}

	/// Render `lines` with `template` when it is non-empty, otherwise with the
	/// default for `dest_file`. Lines pass through untouched when neither
	/// exists.
	pub fn render_with_default(
		&self,
		lines: &[String],
		origin_file: &str,
		dest_file: &str,
		template: &str,
	) -> SnipResult<Vec<String>> {
		let source = if template.is_empty() {
			match self.template_for(dest_file) {
				Some(default) => default.template.as_str(),
				None => return Ok(lines.to_vec()),
			}
		} else {
			template
		};

		render_lines(source, lines, origin_file).map_err(|e| {
			SnipError::TemplateRender {
				file: dest_file.to_string(),
				reason: e.to_string(),
			}
		})
	}
}

/// The built-in default table: markdown destinations get a fenced code block.
pub fn builtin_templates() -> Vec<DefaultTemplate> {
	vec![DefaultTemplate::new(
		&["md", "markdown"],
		"```\n{{ content }}\n```\n",
	)]
}

/// Render `lines` through `template`, exposing `content` (the lines joined
/// with `\n`) and `filename` (`origin_file`). The output is split back into
/// lines. No destination is known here, so failures name the origin.
pub fn render_template(template: &str, lines: &[String], origin_file: &str) -> SnipResult<Vec<String>> {
	render_lines(template, lines, origin_file).map_err(|e| {
		SnipError::ContentRender {
			origin: origin_file.to_string(),
			reason: e.to_string(),
		}
	})
}

/// Render `template` against sample data to surface syntax errors and
/// references to unknown variables before any file is touched.
pub fn validate_template(template: &str) -> SnipResult<()> {
	let sample = vec!["lorem ipsum".to_string()];
	render_lines(template, &sample, "example.txt")
		.map(|_| ())
		.map_err(|e| SnipError::InvalidTemplate(e.to_string()))
}

/// Expand literal `\n` sequences so a template can be given as a single line
/// on the command line or in config.
pub fn expand_newlines(template: &str) -> String {
	template.replace("\\n", "\n")
}

fn render_lines(
	template: &str,
	lines: &[String],
	origin_file: &str,
) -> Result<Vec<String>, minijinja::Error> {
	let source = expand_newlines(template);

	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
	env.add_template(TEMPLATE_NAME, &source)?;

	let rendered = env.get_template(TEMPLATE_NAME)?.render(minijinja::context! {
		content => lines.join("\n"),
		filename => origin_file,
	})?;

	Ok(rendered.split('\n').map(ToString::to_string).collect())
}
