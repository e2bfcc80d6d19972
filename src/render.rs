//! Canonical rendering of the bot comment for one issue.
//!
//! The rendered body is compared byte-for-byte against the existing comment to decide
//! whether it is stale, so rendering must stay pure and deterministic.

use crate::index::MarkerGroup;

/// Embedded in every comment this tool writes. Used to find that comment again on later runs.
pub const BOT_SIGNATURE: &str = "_This comment was autogenerated by todo-backlinks and is kept in sync with the source tree._ <!-- todo-backlinks:bot-comment -->";

/// Carried by the note block of comments on issues that were closed with TODOs still outstanding.
pub const WARN_SENTINEL: &str = "<!-- todo-backlinks:closed-with-todos -->";

/// Permalink coordinates used to build links to each marker.
#[derive(Clone, Debug, Eq, PartialEq, derive_new::new)]
pub struct CommentRenderer {
	/// Web base URL of the tracker, e.g. `https://github.com`
	server_url: String,
	/// `owner/name`
	repository: String,
	/// Branch or ref the links point at
	base_ref: String,
}

impl CommentRenderer {
	/// `{server}/{repo}/blob/{ref}/{path}#L{line}`
	pub fn permalink(&self, path: &str, line_number: u64) -> String {
		format!("{}/{}/blob/{}/{path}#L{line_number}", self.server_url.trim_end_matches('/'), self.repository, self.base_ref)
	}

	pub fn render(&self, group: &MarkerGroup, warn_closed: bool) -> String {
		let mut body = String::new();

		if warn_closed {
			body.push_str(&warn_block());
			body.push_str("\n\n");
		}

		body.push_str(&format!("This issue has {} outstanding TODOs:\n\n", group.len()));
		for marker in group {
			body.push_str(&format!(" - [{}]({}): {}\n", marker.location(), self.permalink(&marker.source_path, marker.line_number), marker.message));
		}

		body.push('\n');
		body.push_str(BOT_SIGNATURE);
		body
	}
}

/// Two-line blockquote prepended to comments on closed issues.
fn warn_block() -> String {
	format!("> [!WARNING]\n> This issue was closed, but the TODOs below still reference it. {WARN_SENTINEL}")
}
