//! Shared test infrastructure for integration tests.
//!
//! Provides:
//! - `FakeScanner`, which serves canned `git grep` lines
//! - `settings`, a `Settings` pointing at the default test repository
//! - `body`, which renders the expected bot comment for a set of search lines

use std::path::PathBuf;

use color_eyre::eyre::Result;
use rstest::fixture;
use todo_backlinks::{CommentRenderer, MarkerIndex, Settings, SourceScanner, config::Repository, mock_github::MockGitHubClient, parse_matches};
use url::Url;

/// Default test repository coordinates
pub const DEFAULT_OWNER: &str = "j2kun";
pub const DEFAULT_REPO: &str = "todo-backlinks";

/// Serves canned search output instead of running git.
#[derive(Default)]
pub struct FakeScanner {
	matches: Vec<String>,
}

impl FakeScanner {
	pub fn new(matches: &[&str]) -> Self {
		Self {
			matches: matches.iter().map(|m| m.to_string()).collect(),
		}
	}
}

impl SourceScanner for FakeScanner {
	fn scan(&self) -> Result<String> {
		Ok(self.matches.join("\n"))
	}
}

#[fixture]
pub fn mock() -> MockGitHubClient {
	MockGitHubClient::new()
}

pub fn settings(dry_run: bool, output_file: Option<PathBuf>) -> Settings {
	Settings {
		token: "test-token".to_string(),
		repository: Repository {
			owner: DEFAULT_OWNER.to_string(),
			name: DEFAULT_REPO.to_string(),
		},
		server_url: Url::parse("https://github.com").unwrap(),
		api_url: Url::parse("https://api.github.com").unwrap(),
		base_ref: "main".to_string(),
		dry_run,
		path_filter: None,
		root: PathBuf::from("."),
		output_file,
	}
}

pub fn renderer() -> CommentRenderer {
	CommentRenderer::from(&settings(false, None))
}

/// Index built from search lines, exactly as a run would build it.
pub fn index(lines: &[&str]) -> MarkerIndex {
	MarkerIndex::from_markers(parse_matches(&lines.join("\n")).unwrap())
}

/// The comment the tool would render for `issue_number` given these search lines.
pub fn body(lines: &[&str], issue_number: u64, warn_closed: bool) -> String {
	renderer().render(index(lines).get(issue_number).unwrap(), warn_closed)
}
