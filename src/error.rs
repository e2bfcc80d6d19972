//! Error types for parsing search output.
//!
//! Uses miette for rich diagnostics with source code spans.

#![allow(unused_assignments)] // Fields are read by miette's derive macro via attributes

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Name shown in diagnostics for the raw search output.
pub const SEARCH_OUTPUT_NAME: &str = "<git grep output>";

/// What exactly is wrong with a single search result line.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MalformedKind {
	#[error("expected at least 4 colon-separated fields, found {0}")]
	TooFewFields(usize),
	#[error("line number `{0}` is not a positive integer")]
	InvalidLineNumber(String),
	#[error("no `(#N)` issue reference in `{0}`")]
	MissingIssueReference(String),
	#[error("TODO has an empty message")]
	EmptyMessage,
}

/// A search result line that does not follow the `<path>:<line>: TODO(#N): message` grammar.
///
/// Fatal for the whole run: a single bad line means the grammar assumption no longer holds.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("malformed search result: {kind}")]
#[diagnostic(code(todo_backlinks::parse::malformed_match), help("every match must look like '<path>:<line>: TODO(#N): message'"))]
pub struct MatchError {
	#[source_code]
	src: NamedSource<String>,
	#[label("{kind}")]
	span: SourceSpan,
	pub kind: MalformedKind,
	/// 1-indexed line of the search output the error points at.
	pub output_line: usize,
}

impl MatchError {
	pub(crate) fn new(output: &str, span: SourceSpan, output_line: usize, kind: MalformedKind) -> Self {
		Self {
			src: NamedSource::new(SEARCH_OUTPUT_NAME, output.to_string()),
			span,
			kind,
			output_line,
		}
	}
}
