use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::eyre::{Result, bail};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::config::Settings;

/// Page size for list endpoints (the API maximum).
const PER_PAGE: usize = 100;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
	#[display("open")]
	Open,
	#[display("closed")]
	Closed,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TrackerIssue {
	pub number: u64,
	pub state: IssueStatus,
	/// Only present when the "issue" is actually a pull request
	#[serde(default)]
	pub pull_request: Option<serde_json::Value>,
}

impl TrackerIssue {
	pub fn is_open(&self) -> bool {
		self.state == IssueStatus::Open
	}

	pub fn is_pull_request(&self) -> bool {
		self.pull_request.is_some()
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct TrackerComment {
	pub id: u64,
	pub body: Option<String>,
}

//==============================================================================
// Issue Tracker Trait
//==============================================================================

/// Every tracker operation the reconciliation needs, scoped to one repository.
/// This allows for both real API calls and mock implementations for testing.
#[async_trait]
pub trait IssueTracker: Send + Sync {
	/// Fetch a single issue by number. `None` if it doesn't exist.
	async fn fetch_issue(&self, issue_number: u64) -> Result<Option<TrackerIssue>>;

	/// Fetch all comments on an issue, oldest first
	async fn fetch_comments(&self, issue_number: u64) -> Result<Vec<TrackerComment>>;

	/// List every open issue, pull requests excluded
	async fn list_open_issues(&self) -> Result<Vec<TrackerIssue>>;

	/// Create a new comment on an issue
	async fn create_comment(&self, issue_number: u64, body: &str) -> Result<()>;

	/// Update a comment's body
	async fn update_comment(&self, comment_id: u64, body: &str) -> Result<()>;

	/// Delete a comment
	async fn delete_comment(&self, comment_id: u64) -> Result<()>;
}

//==============================================================================
// Real GitHub Client Implementation
//==============================================================================

/// GitHub REST API client
pub struct RealGitHubClient {
	http_client: Client,
	api_url: String,
	repository: String,
	github_token: String,
}

impl RealGitHubClient {
	pub fn new(settings: &Settings) -> Self {
		Self {
			http_client: Client::new(),
			api_url: settings.api_url.as_str().trim_end_matches('/').to_string(),
			repository: settings.repository.to_string(),
			github_token: settings.token.clone(),
		}
	}

	fn request(&self, method: Method, path: &str) -> RequestBuilder {
		self.http_client
			.request(method, format!("{}/repos/{}/{path}", self.api_url, self.repository))
			.header("User-Agent", concat!("todo-backlinks/", env!("CARGO_PKG_VERSION")))
			.header("Accept", "application/vnd.github+json")
			.header("Authorization", format!("Bearer {}", self.github_token))
	}

	/// Follow `page=N` until a short page comes back.
	async fn get_paginated<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<Vec<T>> {
		let separator = if path.contains('?') { '&' } else { '?' };
		let mut items = Vec::new();

		for page in 1.. {
			let res = self.request(Method::GET, &format!("{path}{separator}per_page={PER_PAGE}&page={page}")).send().await?;

			if !res.status().is_success() {
				let status = res.status();
				let body = res.text().await.unwrap_or_default();
				bail!("Failed to fetch {what}: {status} - {body}");
			}

			let batch = res.json::<Vec<T>>().await?;
			let done = batch.len() < PER_PAGE;
			items.extend(batch);
			if done {
				break;
			}
		}

		Ok(items)
	}
}

#[async_trait]
impl IssueTracker for RealGitHubClient {
	async fn fetch_issue(&self, issue_number: u64) -> Result<Option<TrackerIssue>> {
		let res = self.request(Method::GET, &format!("issues/{issue_number}")).send().await?;

		// 410 is what GitHub answers for deleted issues
		if matches!(res.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
			return Ok(None);
		}

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to fetch issue #{issue_number}: {status} - {body}");
		}

		let issue = res.json::<TrackerIssue>().await?;
		Ok(Some(issue))
	}

	async fn fetch_comments(&self, issue_number: u64) -> Result<Vec<TrackerComment>> {
		self.get_paginated(&format!("issues/{issue_number}/comments"), &format!("comments of #{issue_number}")).await
	}

	async fn list_open_issues(&self) -> Result<Vec<TrackerIssue>> {
		let issues: Vec<TrackerIssue> = self.get_paginated("issues?state=open", "open issues").await?;
		Ok(issues.into_iter().filter(|issue| !issue.is_pull_request()).collect())
	}

	async fn create_comment(&self, issue_number: u64, body: &str) -> Result<()> {
		let res = self
			.request(Method::POST, &format!("issues/{issue_number}/comments"))
			.json(&serde_json::json!({ "body": body }))
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to create comment on #{issue_number}: {status} - {body}");
		}

		Ok(())
	}

	async fn update_comment(&self, comment_id: u64, body: &str) -> Result<()> {
		let res = self
			.request(Method::PATCH, &format!("issues/comments/{comment_id}"))
			.json(&serde_json::json!({ "body": body }))
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to update comment {comment_id}: {status} - {body}");
		}

		Ok(())
	}

	async fn delete_comment(&self, comment_id: u64) -> Result<()> {
		let res = self.request(Method::DELETE, &format!("issues/comments/{comment_id}")).send().await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to delete comment {comment_id}: {status} - {body}");
		}

		Ok(())
	}
}

//==============================================================================
// Convenience type alias for boxed client
//==============================================================================

pub type BoxedIssueTracker = Arc<dyn IssueTracker>;

/// Create a GitHub client from settings.
pub fn create_client(settings: &Settings) -> BoxedIssueTracker {
	Arc::new(RealGitHubClient::new(settings))
}
