//! Snapshot of one issue as the reconciliation sees it.

use color_eyre::eyre::Result;
use tracing::instrument;

use crate::{
	github::{IssueTracker, TrackerComment},
	render::{BOT_SIGNATURE, WARN_SENTINEL},
};

/// A bot-authored comment. The body has carriage returns stripped, so it compares
/// cleanly against a freshly rendered one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
	pub id: u64,
	pub body: String,
}

impl Comment {
	pub fn new(id: u64, body: &str) -> Self {
		Self { id, body: body.replace('\r', "") }
	}

	pub fn contains_warn_sentinel(&self) -> bool {
		self.body.contains(WARN_SENTINEL)
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssueState {
	pub number: u64,
	pub exists: bool,
	pub open: bool,
	pub bot_comment: Option<Comment>,
}

impl IssueState {
	pub fn missing(number: u64) -> Self {
		Self {
			number,
			exists: false,
			open: false,
			bot_comment: None,
		}
	}
}

/// First comment carrying the bot signature. Later duplicates are ignored.
pub fn find_bot_comment(comments: &[TrackerComment]) -> Option<Comment> {
	comments.iter().find_map(|c| {
		let body = c.body.as_deref()?;
		body.contains(BOT_SIGNATURE).then(|| Comment::new(c.id, body))
	})
}

/// Fetch the issue and locate its bot comment. Comments are only fetched for issues that exist.
#[instrument(skip(tracker))]
pub async fn fetch_issue_state(tracker: &dyn IssueTracker, issue_number: u64) -> Result<IssueState> {
	let Some(issue) = tracker.fetch_issue(issue_number).await? else {
		return Ok(IssueState::missing(issue_number));
	};

	let comments = tracker.fetch_comments(issue_number).await?;
	Ok(IssueState {
		number: issue_number,
		exists: true,
		open: issue.is_open(),
		bot_comment: find_bot_comment(&comments),
	})
}
