//! Marker parsing from line-numbered search output.
//!
//! Each input line looks like `<path>:<line>:<matched text>`, where the matched text
//! holds a `TODO(#N): message` marker. Only the first three colons are structural;
//! everything after them belongs to the message.

use miette::SourceSpan;

use crate::error::{MalformedKind, MatchError};

/// A single `TODO(#N): message` occurrence in the source tree.
#[derive(Clone, Debug, Eq, Hash, PartialEq, derive_new::new)]
pub struct Marker {
	pub source_path: String,
	pub line_number: u64,
	pub issue_number: u64,
	pub message: String,
}

impl Marker {
	/// Decode one `<path>:<line>:<matched text>` search result.
	pub fn decode(line: &str) -> Result<Self, MalformedKind> {
		let fields: Vec<&str> = line.split(':').collect();
		if fields.len() < 4 {
			return Err(MalformedKind::TooFewFields(fields.len()));
		}

		let line_number = fields[1]
			.trim()
			.parse::<u64>()
			.ok()
			.filter(|n| *n > 0)
			.ok_or_else(|| MalformedKind::InvalidLineNumber(fields[1].to_string()))?;
		let issue_number = issue_reference(fields[2]).ok_or_else(|| MalformedKind::MissingIssueReference(fields[2].trim().to_string()))?;

		// Messages may legitimately contain colons
		let message = fields[3..].join(":").trim().to_string();
		if message.is_empty() {
			return Err(MalformedKind::EmptyMessage);
		}

		Ok(Self::new(fields[0].to_string(), line_number, issue_number, message))
	}

	/// `path:line`, as shown in the link text of a rendered comment.
	pub fn location(&self) -> String {
		format!("{}:{}", self.source_path, self.line_number)
	}
}

/// Extract `N` from the `(#N)` part of a marker tag like `  // TODO(#12)`.
fn issue_reference(tag: &str) -> Option<u64> {
	let start = tag.find("TODO(").map(|i| i + "TODO(".len()).or_else(|| tag.find('(').map(|i| i + 1))?;
	let end = start + tag[start..].find(')')?;
	let inner = tag[start..end].trim();
	let digits = inner.strip_prefix('#').unwrap_or(inner);
	digits.parse::<u64>().ok().filter(|n| *n > 0)
}

/// Parse the full output of a line-numbered search into markers.
///
/// Empty output is not an error, it just means there are no markers. Any malformed line
/// aborts parsing entirely.
pub fn parse_matches(output: &str) -> Result<Vec<Marker>, MatchError> {
	let mut markers = Vec::new();
	let mut offset = 0;

	for (idx, raw) in output.split('\n').enumerate() {
		let line = raw.strip_suffix('\r').unwrap_or(raw);
		if !line.trim().is_empty() {
			let marker = Marker::decode(line).map_err(|kind| MatchError::new(output, SourceSpan::from((offset, line.len())), idx + 1, kind))?;
			markers.push(marker);
		}
		offset += raw.len() + 1;
	}

	tracing::debug!(count = markers.len(), "parsed markers from search output");
	Ok(markers)
}
