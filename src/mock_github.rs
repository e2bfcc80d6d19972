//! Mock GitHub client for testing purposes.
//!
//! This module provides a mock implementation of the IssueTracker trait that stores
//! all data in memory and can be used for integration testing without hitting the real API.

use std::{
	collections::BTreeMap,
	sync::{
		Mutex,
		atomic::{AtomicU64, Ordering},
	},
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, bail, eyre};
use tracing::instrument;

use crate::github::{IssueStatus, IssueTracker, TrackerComment, TrackerIssue};

/// Internal representation of a comment in the mock
#[derive(Clone, Debug)]
struct MockCommentData {
	issue_number: u64,
	body: String,
}

/// Mock GitHub client that stores all state in memory.
/// Thread-safe for use in async contexts.
pub struct MockGitHubClient {
	/// Counter for generating unique comment IDs
	next_comment_id: AtomicU64,

	/// All issues: issue_number -> state
	issues: Mutex<BTreeMap<u64, IssueStatus>>,

	/// All comments: comment_id -> comment. Ids only grow, so iteration order is creation order.
	comments: Mutex<BTreeMap<u64, MockCommentData>>,

	/// Method name that should fail on its next call
	fail_on: Mutex<Option<String>>,

	/// Call log for debugging
	call_log: Mutex<Vec<String>>,
}

impl Default for MockGitHubClient {
	fn default() -> Self {
		Self::new()
	}
}

impl MockGitHubClient {
	pub fn new() -> Self {
		Self {
			next_comment_id: AtomicU64::new(5000),
			issues: Mutex::new(BTreeMap::new()),
			comments: Mutex::new(BTreeMap::new()),
			fail_on: Mutex::new(None),
			call_log: Mutex::new(Vec::new()),
		}
	}

	/// Add an issue to the mock state
	pub fn add_issue(&self, number: u64, state: IssueStatus) {
		self.issues.lock().unwrap().insert(number, state);
	}

	/// Add a comment to an issue, returning its id
	pub fn add_comment(&self, issue_number: u64, body: &str) -> u64 {
		let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
		self.comments.lock().unwrap().insert(
			id,
			MockCommentData {
				issue_number,
				body: body.to_string(),
			},
		);
		id
	}

	pub fn set_issue_state(&self, number: u64, state: IssueStatus) {
		self.add_issue(number, state);
	}

	/// Bodies of all comments on an issue, oldest first
	pub fn comment_bodies(&self, issue_number: u64) -> Vec<String> {
		self.comments.lock().unwrap().values().filter(|c| c.issue_number == issue_number).map(|c| c.body.clone()).collect()
	}

	/// Make the next call to `method` (e.g. `"fetch_comments"`) return an error
	pub fn fail_next(&self, method: &str) {
		*self.fail_on.lock().unwrap() = Some(method.to_string());
	}

	/// Get the call log for debugging
	pub fn get_call_log(&self) -> Vec<String> {
		self.call_log.lock().unwrap().clone()
	}

	/// Only the calls that write to the tracker
	pub fn write_calls(&self) -> Vec<String> {
		self.get_call_log()
			.into_iter()
			.filter(|c| c.starts_with("create_comment") || c.starts_with("update_comment") || c.starts_with("delete_comment"))
			.collect()
	}

	/// Clear the call log
	pub fn clear_call_log(&self) {
		self.call_log.lock().unwrap().clear();
	}

	fn log_call(&self, method: &str, call: &str) -> Result<()> {
		self.call_log.lock().unwrap().push(call.to_string());

		let mut fail_on = self.fail_on.lock().unwrap();
		if fail_on.as_deref() == Some(method) {
			*fail_on = None;
			bail!("Injected failure in {method}: 502 Bad Gateway");
		}
		Ok(())
	}

	fn convert_issue(number: u64, state: IssueStatus) -> TrackerIssue {
		TrackerIssue { number, state, pull_request: None }
	}
}

#[async_trait]
impl IssueTracker for MockGitHubClient {
	#[instrument(skip(self), name = "MockGitHubClient::fetch_issue")]
	async fn fetch_issue(&self, issue_number: u64) -> Result<Option<TrackerIssue>> {
		tracing::info!(target: "mock_github", issue_number, "fetch_issue");
		self.log_call("fetch_issue", &format!("fetch_issue({issue_number})"))?;

		let issues = self.issues.lock().unwrap();
		Ok(issues.get(&issue_number).map(|state| Self::convert_issue(issue_number, *state)))
	}

	#[instrument(skip(self), name = "MockGitHubClient::fetch_comments")]
	async fn fetch_comments(&self, issue_number: u64) -> Result<Vec<TrackerComment>> {
		tracing::info!(target: "mock_github", issue_number, "fetch_comments");
		self.log_call("fetch_comments", &format!("fetch_comments({issue_number})"))?;

		if !self.issues.lock().unwrap().contains_key(&issue_number) {
			bail!("Failed to fetch comments of #{issue_number}: 404 Not Found");
		}

		let comments = self.comments.lock().unwrap();
		Ok(comments
			.iter()
			.filter(|(_, c)| c.issue_number == issue_number)
			.map(|(id, c)| TrackerComment { id: *id, body: Some(c.body.clone()) })
			.collect())
	}

	#[instrument(skip(self), name = "MockGitHubClient::list_open_issues")]
	async fn list_open_issues(&self) -> Result<Vec<TrackerIssue>> {
		tracing::info!(target: "mock_github", "list_open_issues");
		self.log_call("list_open_issues", "list_open_issues()")?;

		let issues = self.issues.lock().unwrap();
		Ok(issues
			.iter()
			.filter(|(_, state)| **state == IssueStatus::Open)
			.map(|(number, state)| Self::convert_issue(*number, *state))
			.collect())
	}

	#[instrument(skip(self, body), name = "MockGitHubClient::create_comment")]
	async fn create_comment(&self, issue_number: u64, body: &str) -> Result<()> {
		tracing::info!(target: "mock_github", issue_number, "create_comment");
		self.log_call("create_comment", &format!("create_comment({issue_number})"))?;

		if !self.issues.lock().unwrap().contains_key(&issue_number) {
			bail!("Failed to create comment on #{issue_number}: 404 Not Found");
		}
		self.add_comment(issue_number, body);
		Ok(())
	}

	#[instrument(skip(self, body), name = "MockGitHubClient::update_comment")]
	async fn update_comment(&self, comment_id: u64, body: &str) -> Result<()> {
		tracing::info!(target: "mock_github", comment_id, "update_comment");
		self.log_call("update_comment", &format!("update_comment({comment_id})"))?;

		let mut comments = self.comments.lock().unwrap();
		let comment = comments.get_mut(&comment_id).ok_or_else(|| eyre!("Comment not found: {comment_id}"))?;
		comment.body = body.to_string();
		Ok(())
	}

	#[instrument(skip(self), name = "MockGitHubClient::delete_comment")]
	async fn delete_comment(&self, comment_id: u64) -> Result<()> {
		tracing::info!(target: "mock_github", comment_id, "delete_comment");
		self.log_call("delete_comment", &format!("delete_comment({comment_id})"))?;

		let mut comments = self.comments.lock().unwrap();
		comments.remove(&comment_id).ok_or_else(|| eyre!("Comment not found: {comment_id}"))?;
		Ok(())
	}
}
