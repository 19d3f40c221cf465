//! Tolerant `WWW-Authenticate` challenge parsing.
//!
//! Real-world servers vary wildly in how they render challenge parameters, so this is a
//! small hand-written scan rather than a strict grammar parser. It accepts either quote
//! style, free whitespace around `=`, and the parameter in any position; it ignores
//! unquoted or empty values instead of partially parsing them.

const PARAM_NAME: &str = "resource_metadata";

/// Extracts the `resource_metadata` URL hint from a `WWW-Authenticate` header value.
///
/// Returns `None` when the header is absent or empty, carries no `resource_metadata`
/// parameter, or renders the value unquoted (non-conformant occurrences are skipped, not
/// partially parsed). The parameter name is matched ASCII case-insensitively.
pub fn resource_metadata_hint(header: Option<&str>) -> Option<String> {
	let header = header?;
	let bytes = header.as_bytes();
	let mut search_from = 0;

	while let Some(start) = find_param_name(header, search_from) {
		search_from = start + PARAM_NAME.len();

		// Reject matches that are merely a suffix of a longer parameter name.
		if start > 0 && !matches!(bytes[start - 1], b' ' | b'\t' | b',') {
			continue;
		}

		let mut cursor = skip_whitespace(bytes, start + PARAM_NAME.len());

		if bytes.get(cursor) != Some(&b'=') {
			continue;
		}

		cursor = skip_whitespace(bytes, cursor + 1);

		let quote = match bytes.get(cursor) {
			Some(&b'"') => b'"',
			Some(&b'\'') => b'\'',
			_ => continue,
		};
		let value_start = cursor + 1;
		let Some(value_len) = header[value_start..].find(quote as char) else {
			continue;
		};
		let value = &header[value_start..value_start + value_len];

		if value.is_empty() {
			continue;
		}

		return Some(value.to_owned());
	}

	None
}

fn find_param_name(header: &str, from: usize) -> Option<usize> {
	header.get(from..)?.to_ascii_lowercase().find(PARAM_NAME).map(|position| from + position)
}

fn skip_whitespace(bytes: &[u8], mut cursor: usize) -> usize {
	while matches!(bytes.get(cursor), Some(b' ' | b'\t')) {
		cursor += 1;
	}

	cursor
}
