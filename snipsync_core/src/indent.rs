/// Compute the longest prefix made only of spaces and tabs that every line
/// shares.
///
/// Comparing the lexicographically first and last lines is enough: any
/// divergence between the extremes of a sorted set means some line diverges.
pub fn common_indent(lines: &[String]) -> String {
	let (Some(first), Some(last)) = (lines.iter().min(), lines.iter().max()) else {
		return String::new();
	};

	first
		.chars()
		.zip(last.chars())
		.take_while(|(a, b)| a == b && matches!(a, ' ' | '\t'))
		.map(|(a, _)| a)
		.collect()
}

/// Remove the common indentation from every line, keeping relative
/// indentation intact.
pub fn strip_common_indent(lines: &[String]) -> Vec<String> {
	let prefix = common_indent(lines);

	lines
		.iter()
		.map(|line| line.strip_prefix(prefix.as_str()).unwrap_or(line).to_string())
		.collect()
}
